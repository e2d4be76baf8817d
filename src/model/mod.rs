//! Query and record types exchanged with the service.
//!
//! - [`PackageQuery`] - one artifact lookup (manager, name, optional version)
//! - [`PackageRef`] - one package for the v2 vulnerability endpoint
//! - [`CpeTriple`] - the (part, vendor, product) parsed from a CPE URI
//! - [`ArtifactResult`], [`CpeDetail`], [`CveDetail`], [`ScmDetail`] - opaque
//!   records returned by the service
//!
//! # Example
//!
//! ```
//! use ossindex::{CpeTriple, PackageQuery};
//!
//! let query = PackageQuery::new("npm", "lodash").with_version("4.17.21");
//! assert_eq!(query.version.as_deref(), Some("4.17.21"));
//!
//! let cpe: CpeTriple = "cpe:/a:vendor1:product1".parse().unwrap();
//! assert_eq!(cpe.product, "product1");
//! ```

mod cpe;
mod package;
mod record;

pub use cpe::*;
pub use package::*;
pub use record::*;
