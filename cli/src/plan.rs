/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use anyhow::Result;
use console::style;
use serde_json::Value;
use std::io::Write;
use tsprov_core::{state::StateChange, Plan};
use tsprov_sdk::ResourceAction;

const GUTTER: &str = "   |       ";

pub fn write_to_stdout_ignore_sigpipe(bytes: &[u8]) -> Result<(), std::io::Error> {
    use std::io::ErrorKind;

    match std::io::stdout().write_all(bytes) {
        Ok(()) => Ok(()),
        Err(e) => match e.kind() {
            ErrorKind::BrokenPipe => Ok(()),
            _ => Err(e),
        },
    }
}

/// Number of resources to add, change and destroy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub add: usize,
    pub change: usize,
    pub destroy: usize,
}

impl Summary {
    pub fn of(action: &ResourceAction) -> Self {
        match action {
            ResourceAction::Create => Summary { add: 1, ..Default::default() },
            ResourceAction::Update { .. } => Summary { change: 1, ..Default::default() },
            ResourceAction::Replace { .. } => Summary { add: 1, destroy: 1, ..Default::default() },
            ResourceAction::Delete => Summary { destroy: 1, ..Default::default() },
            ResourceAction::Get => Summary::default(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Plan: {} to add, {} to change, {} to destroy.",
            self.add, self.change, self.destroy
        )
    }
}

pub fn print_plan<R>(plan: &Plan<R>) -> Result<()> {
    write_to_stdout_ignore_sigpipe(render_plan(plan).as_bytes())?;
    Ok(())
}

pub fn render_plan<R>(plan: &Plan<R>) -> String {
    if !plan.has_changes() {
        return format!(
            "No changes. [{}] matches the configuration.\n",
            style(plan.urn.as_display()).bold()
        );
    }

    let arrow = match &plan.action {
        ResourceAction::Create => style("   ==>").green().bold(),
        ResourceAction::Delete => style("   ==>").red().bold(),
        ResourceAction::Replace { .. } => style("   ==>").magenta().bold(),
        _ => style("   ==>").cyan().bold(),
    };

    let mut out = format!(
        "\ntsprov will perform the following actions:\n\n{arrow} [{}]: Need to be {}\n",
        style(plan.urn.as_display()).bold(),
        plan.action.action_past_str().to_lowercase()
    );

    if !matches!(plan.action, ResourceAction::Create) {
        for change in plan.changes.iter() {
            out.push_str(&render_change(change));
        }
    }

    out.push_str(&format!("\n{}\n", Summary::of(&plan.action)));
    out
}

fn render_change(change: &StateChange) -> String {
    let path = change.path().to_string();
    match (change.lhs(), change.rhs()) {
        (Some(planned), None) => {
            format!("   |     {} {}: {}\n", style("+").green().bold(), path, style(render_value(planned)).green())
        },
        (None, Some(prior)) => {
            format!("   |     {} {}: {}\n", style("-").red().bold(), path, style(render_value(prior)).red())
        },
        (Some(planned), Some(prior)) => format!(
            "   |     {} {}: {}\n   |     {} {}: {}\n",
            style("-").red().bold(),
            path,
            style(render_value(prior)).red().dim(),
            style("+").green().bold(),
            path,
            style(render_value(planned)).green()
        ),
        (None, None) => String::new(),
    }
}

/// Multi-line strings (TML documents) are printed as they are, aligned on the gutter.
fn render_value(value: &Value) -> String {
    let text = match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    text.trim_end().lines().collect::<Vec<_>>().join(&format!("\n{GUTTER}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tsprov_core::state;
    use tsprov_sdk::{ResourceDiff, Urn};

    fn plan(action: ResourceAction, planned: Value, prior: Value) -> Plan<()> {
        Plan {
            urn: Urn::resource("thoughtspot", "tml", "sales").expect("valid urn"),
            action,
            resource: (),
            prior: None,
            changes: state::diff(&planned, &prior),
        }
    }

    #[test]
    fn summary_counts_replace_twice() {
        let replace = Summary::of(&ResourceAction::Replace { diff: ResourceDiff::default() });
        assert_eq!(replace, Summary { add: 1, change: 0, destroy: 1 });
        assert_eq!(replace.to_string(), "Plan: 1 to add, 0 to change, 1 to destroy.");
    }

    #[test]
    fn update_lists_old_and_new_values() {
        console::set_colors_enabled(false);
        let plan = plan(
            ResourceAction::Update { diff: ResourceDiff::new(vec!["tml".into()]) },
            json!({ "id": "1", "tml": "name: Bar\ndescription: x" }),
            json!({ "id": "1", "tml": "name: Foo" }),
        );

        let rendered = render_plan(&plan);

        assert!(rendered.contains("[thoughtspot:tml?=sales]: Need to be updated"));
        assert!(rendered.contains("   |     - tml: name: Foo\n"));
        assert!(rendered.contains(&format!("   |     + tml: name: Bar\n{GUTTER}description: x\n")));
        assert!(rendered.ends_with("Plan: 0 to add, 1 to change, 0 to destroy.\n"));
    }

    #[test]
    fn no_op_plan() {
        console::set_colors_enabled(false);
        let plan = plan(ResourceAction::Get, json!({ "id": "1" }), json!({ "id": "1" }));
        assert_eq!(render_plan(&plan), "No changes. [thoughtspot:tml?=sales] matches the configuration.\n");
    }
}
