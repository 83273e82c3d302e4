//! Storage trait for the settings document.

use crate::errors::Result;
use crate::settings::WalletSettings;

/// Durable home of [`WalletSettings`].
pub trait SettingsStore: Send + Sync {
    /// Read the document. A store that was never written yields defaults.
    fn load(&self) -> Result<WalletSettings>;

    /// Replace the document.
    fn save(&self, settings: &WalletSettings) -> Result<()>;

    /// Read, modify and write the document, returning what was written.
    ///
    /// Implementations that can be shared between threads override this to
    /// make the sequence atomic.
    fn update(&self, op: &mut dyn FnMut(&mut WalletSettings)) -> Result<WalletSettings> {
        let mut settings = self.load()?;
        op(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
