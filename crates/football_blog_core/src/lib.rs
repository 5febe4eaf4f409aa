pub mod domain;
pub mod password;
pub mod ports;

pub use domain::{
    BlogEntry, Category, Comment, Confidence, EntryDraft, EntryQuery, Image, InvalidConfidence,
    LifecycleError, Link, NewUser, Prediction, SortOrder, User, UserCredentials,
};
pub use password::PasswordDigest;
pub use ports::{DatabaseService, PortError, PortResult};
