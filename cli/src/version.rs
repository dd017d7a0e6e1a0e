/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


/// Version shown by `tsprov --version` and in panic reports.
pub const LONG_VERSION: &str =
	concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH_SHORT"), ")");
