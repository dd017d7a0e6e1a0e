/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


fn main() {
	let hash = git_commit_hash();
	println!("cargo:rustc-env=GIT_COMMIT_HASH={}", hash);
	println!("cargo:rustc-env=GIT_COMMIT_HASH_SHORT={}", hash.get(..7).unwrap_or(&hash));
	println!("cargo:rerun-if-env-changed=GIT_COMMIT_HASH");
}

fn git_commit_hash() -> String {
	std::process::Command::new("git")
		.args(["rev-list", "-1", "HEAD"])
		.output()
		.ok()
		.filter(|output| output.status.success())
		.and_then(|output| String::from_utf8(output.stdout).ok())
		.map(|hash| hash.trim().to_string())
		.filter(|hash| !hash.is_empty())
		// outside of a git checkout, e.g. `cargo install`
		.unwrap_or_else(|| "UNKNOWN".to_string())
}
