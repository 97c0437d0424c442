use std::collections::HashMap;
use std::env;

/// Read-only name-to-value lookup used to expand `$NAME` tokens.
pub trait Environment {
	fn lookup(&self, name: &str) -> Option<String>;
}

/// The interpreter's own process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
	fn lookup(&self, name: &str) -> Option<String> {
		// Names that are empty or contain '=' or NUL would make the libc lookup panic.
		if name.is_empty() || name.contains(['=', '\0']) {
			return None;
		}
		env::var_os(name).map(|v| v.to_string_lossy().into_owned())
	}
}

impl Environment for HashMap<String, String> {
	fn lookup(&self, name: &str) -> Option<String> {
		self.get(name).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn map_lookup() {
		let mut vars = HashMap::new();
		vars.insert("KEY".to_string(), "VALUE".to_string());
		assert_eq!(vars.lookup("KEY"), Some("VALUE".to_string()));
		assert_eq!(vars.lookup("MISSING"), None);
	}

	#[test]
	fn process_lookup() {
		assert!(ProcessEnvironment.lookup("PATH").is_some());
		assert_eq!(ProcessEnvironment.lookup("MSH_SURELY_UNSET_VARIABLE_4821"), None);
		assert_eq!(ProcessEnvironment.lookup(""), None);
		assert_eq!(ProcessEnvironment.lookup("A=B"), None);
	}
}
