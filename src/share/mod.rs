pub(crate) mod download;
pub(crate) mod target;

pub(crate) use download::download_file_name;
