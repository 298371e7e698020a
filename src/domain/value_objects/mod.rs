mod bucket_name;
mod object_key;
mod url_expiration;

pub use bucket_name::BucketName;
pub use object_key::ObjectKey;
pub use url_expiration::UrlExpiration;
