/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use serde_json::Value;
use std::{collections::BTreeSet, fmt, ops::Deref};
use tsprov_sdk::ResourceDiff;

/// Location of a change inside a resource state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path {
	Root,
	Keys(Vec<Key>),
}

impl Path {
	fn append(&self, next: Key) -> Path {
		match self {
			Path::Root => Path::Keys(vec![next]),
			Path::Keys(list) => {
				let mut copy = list.clone();
				copy.push(next);
				Path::Keys(copy)
			},
		}
	}

	/// The top level attribute the path starts with.
	pub fn attribute(&self) -> Option<&str> {
		match self {
			Path::Keys(keys) => match keys.first() {
				Some(Key::Field(field)) => Some(field),
				_ => None,
			},
			Path::Root => None,
		}
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Path::Root => write!(f, "."),
			Path::Keys(keys) => {
				let mut first = true;
				for key in keys {
					match key {
						Key::Idx(_) => write!(f, "{key}")?,
						Key::Field(_) if first => write!(f, "{key}")?,
						Key::Field(_) => write!(f, ".{key}")?,
					}
					first = false;
				}
				Ok(())
			},
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
	Idx(usize),
	Field(String),
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Key::Idx(idx) => write!(f, "[{}]", idx),
			Key::Field(key) => write!(f, "{}", key),
		}
	}
}

/// Every leaf that differs between two states.
#[derive(Default, Debug, Clone)]
pub struct StateDiff {
	changes: Vec<StateChange>,
}

impl Deref for StateDiff {
	type Target = Vec<StateChange>;

	fn deref(&self) -> &Self::Target {
		&self.changes
	}
}

impl StateDiff {
	/// Collapses the changes into the top level attributes they belong to.
	pub fn resource_diff(&self) -> ResourceDiff {
		let attributes = self
			.changes
			.iter()
			.map(|change| change.path.attribute().map(String::from).unwrap_or_else(|| change.path.to_string()))
			.collect::<BTreeSet<_>>();
		ResourceDiff::new(attributes.into_iter().collect())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateChange {
	path: Path,
	lhs: Option<Value>,
	rhs: Option<Value>,
}

impl StateChange {
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Habitually the planned state, `None` when the key was removed.
	pub fn lhs(&self) -> Option<&Value> {
		self.lhs.as_ref()
	}

	/// Habitually the prior state, `None` when the key is new.
	pub fn rhs(&self) -> Option<&Value> {
		self.rhs.as_ref()
	}

	pub fn is_addition(&self) -> bool {
		self.rhs.is_none()
	}

	pub fn is_removal(&self) -> bool {
		self.lhs.is_none()
	}
}

/// Compares the planned state `lhs` with the prior state `rhs`.
pub fn diff(lhs: &Value, rhs: &Value) -> StateDiff {
	let mut changes = vec![];
	diff_with(lhs, rhs, Path::Root, &mut changes);
	StateDiff { changes }
}

fn diff_with(lhs: &Value, rhs: &Value, path: Path, acc: &mut Vec<StateChange>) {
	let mut folder = DiffFolder { rhs, path, acc };
	match lhs {
		Value::Array(lhs) => folder.on_array(lhs),
		Value::Object(lhs) => folder.on_object(lhs),
		_ => folder.on_scalar(lhs),
	}
}

struct DiffFolder<'a> {
	rhs: &'a Value,
	path: Path,
	acc: &'a mut Vec<StateChange>,
}

impl<'a> DiffFolder<'a> {
	fn changed(&mut self, lhs: &Value) {
		self.acc.push(StateChange {
			lhs: Some(lhs.clone()),
			rhs: Some(self.rhs.clone()),
			path: self.path.clone(),
		});
	}

	fn compare(&mut self, key: Key, lhs: Option<&Value>, rhs: Option<&Value>) {
		let path = self.path.append(key);
		match (lhs, rhs) {
			(Some(lhs), Some(rhs)) => diff_with(lhs, rhs, path, self.acc),
			(lhs, rhs) =>
				self.acc.push(StateChange { lhs: lhs.cloned(), rhs: rhs.cloned(), path }),
		}
	}

	fn on_scalar(&mut self, lhs: &Value) {
		if self.rhs != lhs {
			self.changed(lhs);
		}
	}

	fn on_array(&mut self, lhs: &[Value]) {
		let Some(rhs) = self.rhs.as_array() else {
			return self.changed(&Value::Array(lhs.to_vec()))
		};

		for idx in 0..lhs.len().max(rhs.len()) {
			self.compare(Key::Idx(idx), lhs.get(idx), rhs.get(idx));
		}
	}

	fn on_object(&mut self, lhs: &serde_json::Map<String, Value>) {
		let Some(rhs) = self.rhs.as_object() else {
			return self.changed(&Value::Object(lhs.clone()))
		};

		let keys = lhs.keys().chain(rhs.keys()).collect::<BTreeSet<_>>();
		for key in keys {
			self.compare(Key::Field(key.clone()), lhs.get(key), rhs.get(key));
		}
	}
}
