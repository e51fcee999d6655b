//! Extension manager - Handles extension lifecycle

use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::application::errors::BotError;
use crate::infrastructure::config::ExtensionRef;

use super::catalog::ExtensionCatalog;
use super::registry::{CommandInfo, CommandRegistry, RegistryView};
use super::trait_def::Extension;

/// Outcome of a single lifecycle operation
///
/// Consumed immediately by the caller for a log line and a chat reply;
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionOutcome {
    Loaded,
    Unloaded,
    NotFound,
    AlreadyLoaded,
    NotLoaded,
    SetupFailed(String),
}

impl ExtensionOutcome {
    /// User-facing reply for this outcome
    pub fn reply(&self, name: &str) -> String {
        match self {
            Self::Loaded => format!(
                ":white_check_mark: Extension '{}' loaded successfully!",
                name
            ),
            Self::Unloaded => format!(
                ":white_check_mark: Extension '{}' unloaded successfully!",
                name
            ),
            Self::NotFound => format!(":x: Extension '{}' could not be found!", name),
            Self::AlreadyLoaded => format!(":x: Extension '{}' already loaded!", name),
            Self::NotLoaded => format!(":x: Extension '{}' was not loaded!", name),
            Self::SetupFailed(_) => format!(":x: Extension '{}' failed during setup!", name),
        }
    }

    /// Log line for this outcome, at the level it warrants
    pub fn log(&self, name: &str) {
        match self {
            Self::Loaded => info!("Extension '{}' loaded", name),
            Self::Unloaded => info!("Extension '{}' unloaded", name),
            Self::NotFound => warn!("Extension '{}' could not be found", name),
            Self::AlreadyLoaded => warn!("Extension '{}' already loaded", name),
            Self::NotLoaded => warn!("Extension '{}' was not loaded", name),
            Self::SetupFailed(cause) => {
                error!("Extension '{}' failed during setup: {}", name, cause)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Loaded | Self::Unloaded)
    }
}

/// Manages the extension lifecycle against the command registry
///
/// An extension is either loaded or not; the loaded set and the registry
/// move together, so a name appears in [`RegistryView::extensions`] exactly
/// when its most recent operation succeeded as a load.
pub struct ExtensionManager {
    catalog: ExtensionCatalog,
    loaded: IndexMap<String, Box<dyn Extension>>,
    registry: CommandRegistry,
}

impl ExtensionManager {
    pub fn new(catalog: ExtensionCatalog) -> Self {
        Self {
            catalog,
            loaded: IndexMap::new(),
            registry: CommandRegistry::new(),
        }
    }

    /// Load the named extension and commit its cogs
    pub fn load(&mut self, name: &str) -> ExtensionOutcome {
        if self.loaded.contains_key(name) {
            return ExtensionOutcome::AlreadyLoaded;
        }
        let Some(factory) = self.catalog.get(name) else {
            return ExtensionOutcome::NotFound;
        };

        let extension = factory();
        match extension.setup() {
            Ok(cogs) => {
                for cog in cogs {
                    self.registry.add_cog(name, cog);
                }
                self.loaded.insert(name.to_string(), extension);
                ExtensionOutcome::Loaded
            }
            Err(cause) => ExtensionOutcome::SetupFailed(cause),
        }
    }

    /// Deactivate the named extension and drop its cogs
    pub fn unload(&mut self, name: &str) -> ExtensionOutcome {
        if self.loaded.shift_remove(name).is_some() {
            self.registry.remove_extension(name);
            ExtensionOutcome::Unloaded
        } else {
            ExtensionOutcome::NotLoaded
        }
    }

    /// Unload, then load a fresh instance
    ///
    /// If the fresh setup fails the extension ends up unloaded; the previous
    /// version is not restored.
    pub fn reload(&mut self, name: &str) -> ExtensionOutcome {
        if !self.loaded.contains_key(name) {
            return ExtensionOutcome::NotLoaded;
        }
        if !self.catalog.contains(name) {
            return ExtensionOutcome::NotFound;
        }
        self.unload(name);
        self.load(name)
    }

    /// Load every configured extension in declaration order
    ///
    /// Each extension's fate is independent: failures are logged and the
    /// loop continues. The exception is a setup failure in debug mode,
    /// which aborts startup with the remaining extensions unattempted.
    pub fn load_all(
        &mut self,
        refs: &[ExtensionRef],
        debug: bool,
    ) -> Result<Vec<(ExtensionRef, ExtensionOutcome)>, BotError> {
        let mut results = Vec::with_capacity(refs.len());
        for extension_ref in refs {
            let outcome = self.load(&extension_ref.name);
            outcome.log(&extension_ref.name);
            if debug {
                if let ExtensionOutcome::SetupFailed(cause) = &outcome {
                    return Err(BotError::ExtensionSetup {
                        name: extension_ref.name.clone(),
                        cause: cause.clone(),
                    });
                }
            }
            results.push((extension_ref.clone(), outcome));
        }
        Ok(results)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Snapshot of loaded cogs, extensions, and commands, insertion order
    pub fn view(&self) -> RegistryView {
        RegistryView {
            cogs: self.registry.cog_names(),
            extensions: self.loaded.keys().cloned().collect(),
            commands: self
                .registry
                .commands()
                .map(|command| CommandInfo {
                    name: command.name.clone(),
                    description: command.description.clone(),
                    hidden: command.hidden,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::trait_def::{Cog, Command, Extension};

    struct Static {
        name: &'static str,
        cog: &'static str,
        command: &'static str,
    }

    impl Extension for Static {
        fn name(&self) -> &str {
            self.name
        }

        fn setup(&self) -> Result<Vec<Cog>, String> {
            Ok(vec![Cog::new(self.cog)
                .with_command(Command::new(self.command, |_| Ok("ok".to_string())))])
        }
    }

    struct Broken;

    impl Extension for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn setup(&self) -> Result<Vec<Cog>, String> {
            Err("boom".to_string())
        }
    }

    fn catalog() -> ExtensionCatalog {
        let mut catalog = ExtensionCatalog::new();
        catalog.register("greeter", || {
            Box::new(Static {
                name: "greeter",
                cog: "Greeter",
                command: "hello",
            })
        });
        catalog.register("echo", || {
            Box::new(Static {
                name: "echo",
                cog: "Echo",
                command: "echo",
            })
        });
        catalog.register("broken", || Box::new(Broken));
        catalog
    }

    fn manager() -> ExtensionManager {
        ExtensionManager::new(catalog())
    }

    fn refs(names: &[&str]) -> Vec<ExtensionRef> {
        names
            .iter()
            .map(|name| ExtensionRef {
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn load_missing_extension_is_not_found() {
        let mut manager = manager();
        assert_eq!(manager.load("missing.module"), ExtensionOutcome::NotFound);
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn load_twice_reports_already_loaded() {
        let mut manager = manager();
        assert_eq!(manager.load("greeter"), ExtensionOutcome::Loaded);
        assert_eq!(manager.load("greeter"), ExtensionOutcome::AlreadyLoaded);
        // exactly one registration survives
        assert_eq!(manager.registry().len(), 1);
        assert_eq!(manager.view().extensions, vec!["greeter"]);
    }

    #[test]
    fn failed_setup_registers_nothing() {
        let mut manager = manager();
        assert_eq!(
            manager.load("broken"),
            ExtensionOutcome::SetupFailed("boom".to_string())
        );
        assert!(!manager.is_loaded("broken"));
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn unload_transitions_registry_state() {
        let mut manager = manager();
        manager.load("greeter");
        assert!(manager.registry().contains_command("hello"));

        assert_eq!(manager.unload("greeter"), ExtensionOutcome::Unloaded);
        assert!(!manager.registry().contains_command("hello"));
        assert!(!manager.is_loaded("greeter"));

        assert_eq!(manager.unload("greeter"), ExtensionOutcome::NotLoaded);
    }

    #[test]
    fn reload_requires_a_loaded_extension() {
        let mut manager = manager();
        assert_eq!(manager.reload("greeter"), ExtensionOutcome::NotLoaded);

        manager.load("greeter");
        assert_eq!(manager.reload("greeter"), ExtensionOutcome::Loaded);
        assert!(manager.registry().contains_command("hello"));
    }

    #[test]
    fn reload_setup_failure_leaves_extension_unloaded() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct Flaky {
            attempts: Arc<AtomicUsize>,
        }

        impl Extension for Flaky {
            fn name(&self) -> &str {
                "flaky"
            }

            fn setup(&self) -> Result<Vec<Cog>, String> {
                if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(vec![Cog::new("Flaky")
                        .with_command(Command::new("flake", |_| Ok("ok".to_string())))])
                } else {
                    Err("flaked".to_string())
                }
            }
        }

        let attempts = Arc::new(AtomicUsize::new(0));
        let shared = attempts.clone();
        let mut catalog = ExtensionCatalog::new();
        catalog.register("flaky", move || {
            Box::new(Flaky {
                attempts: shared.clone(),
            })
        });
        let mut manager = ExtensionManager::new(catalog);

        assert_eq!(manager.load("flaky"), ExtensionOutcome::Loaded);
        assert!(manager.registry().contains_command("flake"));

        // the fresh setup fails, and the previous version is not restored
        assert_eq!(
            manager.reload("flaky"),
            ExtensionOutcome::SetupFailed("flaked".to_string())
        );
        assert!(!manager.is_loaded("flaky"));
        assert!(!manager.registry().contains_command("flake"));
        assert!(manager.view().extensions.is_empty());
    }

    #[test]
    fn load_all_continues_past_failures_without_debug() {
        let mut manager = manager();
        let results = manager
            .load_all(&refs(&["greeter", "broken", "echo"]), false)
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1, ExtensionOutcome::Loaded);
        assert_eq!(
            results[1].1,
            ExtensionOutcome::SetupFailed("boom".to_string())
        );
        assert_eq!(results[2].1, ExtensionOutcome::Loaded);
        assert!(manager.is_loaded("echo"));
    }

    #[test]
    fn load_all_aborts_on_setup_failure_in_debug() {
        let mut manager = manager();
        let err = manager
            .load_all(&refs(&["greeter", "broken", "echo"]), true)
            .unwrap_err();

        assert!(matches!(
            err,
            BotError::ExtensionSetup { ref name, .. } if name == "broken"
        ));
        // the extension after the failure was never attempted
        assert!(manager.is_loaded("greeter"));
        assert!(!manager.is_loaded("echo"));
    }

    #[test]
    fn load_all_preserves_declaration_order() {
        let mut manager = manager();
        manager.load_all(&refs(&["echo", "greeter"]), false).unwrap();
        let view = manager.view();
        assert_eq!(view.extensions, vec!["echo", "greeter"]);
        assert_eq!(view.cogs, vec!["Echo", "Greeter"]);
    }

    #[test]
    fn view_is_a_snapshot() {
        let mut manager = manager();
        manager.load("greeter");
        let view = manager.view();
        manager.unload("greeter");
        assert_eq!(view.extensions, vec!["greeter"]);
        assert!(manager.view().extensions.is_empty());
    }
}
