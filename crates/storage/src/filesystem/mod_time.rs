use chrono::{DateTime, Utc};
use filetime::FileTime;
use std::io;
use std::path::Path;

/// Set both access and modification time of `path`
pub fn apply(path: &Path, time: DateTime<Utc>) -> io::Result<()> {
    let file_time = FileTime::from_unix_time(time.timestamp(), time.timestamp_subsec_nanos());
    filetime::set_file_times(path, file_time, file_time)
}
