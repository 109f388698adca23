//! Global subscriber installation

use std::sync::OnceLock;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output shape of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Pretty lines on stderr, debug and up for stepvc crates
    Development,
    /// One JSON object per event on stderr, info and up
    Production,
    /// No output unless `RUST_LOG` asks for it
    Quiet,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "stepvc=debug",
            Profile::Production => "stepvc=info",
            Profile::Quiet => "off",
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static ACTIVE: OnceLock<Profile> = OnceLock::new();

/// Install the global subscriber for `profile`
///
/// The first call wins. Later calls, whatever their profile, leave the
/// installed subscriber alone. If something else (such as the test capture)
/// already owns the global slot, the profile is still recorded but nothing
/// is installed.
pub fn init(profile: Profile) {
    ACTIVE.get_or_init(|| {
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(profile.filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(profile.filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Quiet => tracing_subscriber::fmt()
                .with_env_filter(profile.filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!(?profile, "global subscriber already set; keeping it");
        }
        profile
    });
}

/// Profile recorded by the first `init` call, if any
pub fn active_profile() -> Option<Profile> {
    ACTIVE.get().copied()
}
