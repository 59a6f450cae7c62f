pub mod grants;
pub mod issuer;

pub use grants::{Claims, VideoGrants};
pub use issuer::{sign_jwt, IssuedToken, TokenIssuer, DEFAULT_ROOM, TOKEN_TTL_SECS};
