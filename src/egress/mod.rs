pub mod client;
pub mod status;

pub use client::{EgressClient, EgressError, HttpEgressClient};
pub use status::{
    EgressInfo, EgressStatus, EncodedFileOutput, S3Upload, StartRoomCompositeRequest,
};
