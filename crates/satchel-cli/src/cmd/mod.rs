pub(crate) mod archive;
pub(crate) mod run;
pub(crate) mod upload;
