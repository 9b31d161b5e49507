pub mod checkout;
pub mod config;
pub mod system;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command, checkout commands first.
pub fn register_all(registry: &mut CommandRegistry) {
    for entry in checkout::definitions()
        .into_iter()
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
