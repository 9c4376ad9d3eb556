//! Identity collaborators behind the FedCM endpoints: the signed session store
//! plus the pluggable credential, account, client and token backends.
//! Keep the public surface thin and split implementation across sub-modules.

mod account;
mod provider;
mod registry;
mod session;
mod token;

pub use account::{Account, AccountResolver, StaticAccountResolver};
pub use provider::{CredentialValidator, LoginRequest, StaticCredentialValidator};
pub use registry::{ClientMetadata, ClientRegistry, StaticClientRegistry};
pub use session::{Session, SessionCodec, SessionStatus, SessionStore, SESSION_COOKIE};
pub use token::{OpaqueTokenIssuer, TokenIssuer};
