use derive_more::{Display, Error};
use std::path::PathBuf;

pub(crate) type Error = exn::Exn<ErrorKind>;
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub(crate) enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not unpack {}", _0.display())]
    Unpack(#[error(not(source))] PathBuf),
}
