use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use filetime::FileTime;

use crate::error::{FileError, RestoreError};

/// What this platform lets us write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Support {
    pub creation_time: bool,
}

/// Probe timestamp support once at startup.
pub fn check_support() -> Result<Support, RestoreError> {
    if !cfg!(any(unix, windows)) {
        return Err(RestoreError::Unsupported(std::env::consts::OS.to_string()));
    }
    Ok(Support {
        creation_time: cfg!(any(windows, target_os = "macos")),
    })
}

/// Resolve a recorded wall-clock time to an instant.
/// Local times inside a DST fold take the earlier instant.
pub fn to_instant(dt: NaiveDateTime, utc: bool) -> Result<DateTime<Utc>, FileError> {
    if utc {
        return Ok(dt.and_utc());
    }
    dt.and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or(FileError::NonexistentLocalTime(dt))
}

/// Set creation (where supported) and modification time of `path` to `instant`.
pub fn apply(path: &Path, instant: DateTime<Utc>, support: Support) -> Result<(), FileError> {
    if support.creation_time {
        set_created(path, instant.into())?;
    }
    let ft = FileTime::from_unix_time(instant.timestamp(), instant.timestamp_subsec_nanos());
    filetime::set_file_mtime(path, ft)?;
    Ok(())
}

#[cfg(windows)]
fn set_created(path: &Path, time: SystemTime) -> io::Result<()> {
    use std::fs::{FileTimes, OpenOptions};
    use std::os::windows::fs::{FileTimesExt, OpenOptionsExt};

    // Needed to open directories
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;

    let file = OpenOptions::new()
        .write(true)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)?;
    file.set_times(FileTimes::new().set_created(time))
}

#[cfg(target_os = "macos")]
fn set_created(path: &Path, time: SystemTime) -> io::Result<()> {
    use std::fs::{File, FileTimes};
    use std::os::macos::fs::FileTimesExt;

    let file = File::open(path)?;
    file.set_times(FileTimes::new().set_created(time))
}

#[cfg(not(any(windows, target_os = "macos")))]
fn set_created(_path: &Path, _time: SystemTime) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "creation time cannot be set on this platform",
    ))
}
