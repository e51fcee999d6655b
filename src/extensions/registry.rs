//! Command registry - Insertion-ordered cog and command tables

use indexmap::IndexMap;

use super::trait_def::{Cog, Command};

/// A cog committed to the registry by a loaded extension
struct RegisteredCog {
    extension: String,
    commands: Vec<String>,
}

/// Registry of currently active cogs and commands
///
/// Iteration order is insertion order; list output depends on it.
#[derive(Default)]
pub struct CommandRegistry {
    cogs: IndexMap<String, RegisteredCog>,
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a cog and its commands under the given extension
    pub fn add_cog(&mut self, extension: &str, cog: Cog) {
        let command_names: Vec<String> = cog.commands.iter().map(|c| c.name.clone()).collect();
        for command in cog.commands {
            self.commands.insert(command.name.clone(), command);
        }
        self.cogs.insert(
            cog.name,
            RegisteredCog {
                extension: extension.to_string(),
                commands: command_names,
            },
        );
    }

    /// Remove every cog and command the given extension registered
    pub fn remove_extension(&mut self, extension: &str) {
        let owned: Vec<String> = self
            .cogs
            .iter()
            .filter(|(_, cog)| cog.extension == extension)
            .map(|(name, _)| name.clone())
            .collect();
        for name in owned {
            if let Some(cog) = self.cogs.shift_remove(&name) {
                for command in cog.commands {
                    self.commands.shift_remove(&command);
                }
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn cog_names(&self) -> Vec<String> {
        self.cogs.keys().cloned().collect()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Command metadata exposed through a registry snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub description: Option<String>,
    pub hidden: bool,
}

/// Read-only snapshot of registry state, taken at dispatch time
#[derive(Debug, Clone, Default)]
pub struct RegistryView {
    pub cogs: Vec<String>,
    pub extensions: Vec<String>,
    pub commands: Vec<CommandInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cog(name: &str, commands: &[&str]) -> Cog {
        let mut cog = Cog::new(name);
        for command in commands {
            cog = cog.with_command(Command::new(*command, |_| Ok(String::new())));
        }
        cog
    }

    #[test]
    fn cogs_keep_insertion_order() {
        let mut registry = CommandRegistry::new();
        registry.add_cog("x", cog("Zulu", &["z"]));
        registry.add_cog("y", cog("Alpha", &["a"]));
        assert_eq!(registry.cog_names(), vec!["Zulu", "Alpha"]);
    }

    #[test]
    fn remove_extension_drops_only_its_commands() {
        let mut registry = CommandRegistry::new();
        registry.add_cog("first", cog("First", &["one", "two"]));
        registry.add_cog("second", cog("Second", &["three"]));

        registry.remove_extension("first");

        assert!(!registry.contains_command("one"));
        assert!(!registry.contains_command("two"));
        assert!(registry.contains_command("three"));
        assert_eq!(registry.cog_names(), vec!["Second"]);
    }

    #[test]
    fn surviving_entries_keep_their_order_after_removal() {
        let mut registry = CommandRegistry::new();
        registry.add_cog("a", cog("A", &["a1"]));
        registry.add_cog("b", cog("B", &["b1"]));
        registry.add_cog("c", cog("C", &["c1"]));

        registry.remove_extension("b");

        assert_eq!(registry.cog_names(), vec!["A", "C"]);
    }

    #[test]
    fn find_resolves_registered_commands() {
        let mut registry = CommandRegistry::new();
        registry.add_cog("x", cog("X", &["ping"]));
        assert!(registry.find("ping").is_some());
        assert!(registry.find("pong").is_none());
    }
}
