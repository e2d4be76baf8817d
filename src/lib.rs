pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;

pub use client::OssIndexClient;
pub use config::{Config, Endpoint};
pub use error::{Error, Result};
pub use model::{
    ArtifactResult, CpeDetail, CpeTriple, CveDetail, PackageQuery, PackageRef, ScmDetail,
};
pub use transport::{default_user_agent, HttpRequest, HttpResponse, HttpTransport, Method, Transport};
