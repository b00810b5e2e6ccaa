//! Writing key material to disk with the right permission bits.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Write `contents` to `path` readable and writable by the owner only (`0600`).
///
/// On Unix the file is created with mode `0600` (no world-readable window).
/// When `replace` is false the call fails with
/// [`std::io::ErrorKind::AlreadyExists`] if the file is already there.
///
/// # Errors
///
/// Returns any I/O error from creating, chmod-ing or writing the file.
pub fn write_owner_only(path: &Path, contents: &[u8], replace: bool) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if replace {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    let mut file = opts.open(path)?;

    // `mode` only applies on creation; a replaced file keeps its old bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)?;
    file.sync_all()
}

/// Write `contents` to `path` and make it world-readable (`0644`).
///
/// # Errors
///
/// Returns any I/O error from writing or chmod-ing the file.
pub fn write_world_readable(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    }

    Ok(())
}
