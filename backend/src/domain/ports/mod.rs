//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod conversion_command;
mod conversion_source;
mod identity_provider;

pub use conversion_command::{ConversionCommand, FixtureConversionCommand};
#[cfg(test)]
pub use conversion_source::MockConversionSource;
pub use conversion_source::{
    ConversionResponse, ConversionSource, ConversionSourceError, FixtureConversionSource,
    UPSTREAM_STATUS_OK,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FixtureIdentityProvider, IdentityProvider, IdentityProviderError, PendingSignIn, SignInRedirect,
};
