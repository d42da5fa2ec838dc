pub mod authorization;
pub mod claims;
pub mod codec;
pub mod factory;
pub mod key_store;
pub mod lookup;
pub mod token_service;

pub use authorization::authorized;
pub use claims::{Claims, Role, TokenType};
pub use codec::{CodecError, MAX_LEEWAY_SECONDS, TokenCodec, TokenError};
pub use factory::build_token_service;
pub use key_store::KeyStore;
pub use lookup::{LookupError, PublicKeyLookup, StaticKeyLookup};
pub use token_service::{IssuedTokenPair, MAX_TOKEN_TTL_SECONDS, TokenService};
