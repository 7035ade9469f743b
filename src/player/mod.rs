pub mod audio;
pub mod blob;
pub mod ingest;
pub mod playlist;
