//! Entry classification and `ls -l` style mode strings.

use std::fmt;
use std::fs::{FileType, Metadata};

/// What a stat-ed entry is, as far as the resolver cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    Other(OtherKind),
}

/// Entry types that have no readable representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
    Unknown,
}

impl fmt::Display for OtherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Symlink => "symbolic link",
            Self::CharDevice => "character device",
            Self::BlockDevice => "block device",
            Self::Fifo => "named pipe",
            Self::Socket => "socket",
            Self::Unknown => "file of unknown type",
        };
        f.write_str(name)
    }
}

impl EntryKind {
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_file() {
            return Self::Regular;
        }
        if file_type.is_dir() {
            return Self::Directory;
        }
        if file_type.is_symlink() {
            return Self::Other(OtherKind::Symlink);
        }
        Self::Other(special_kind(file_type))
    }

    /// The leading character of an `ls -l` mode string.
    fn type_char(self) -> char {
        match self {
            Self::Regular => '-',
            Self::Directory => 'd',
            Self::Other(OtherKind::Symlink) => 'l',
            Self::Other(OtherKind::CharDevice) => 'c',
            Self::Other(OtherKind::BlockDevice) => 'b',
            Self::Other(OtherKind::Fifo) => 'p',
            Self::Other(OtherKind::Socket) => 's',
            Self::Other(OtherKind::Unknown) => '?',
        }
    }
}

#[cfg(unix)]
fn special_kind(file_type: FileType) -> OtherKind {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_char_device() {
        OtherKind::CharDevice
    } else if file_type.is_block_device() {
        OtherKind::BlockDevice
    } else if file_type.is_fifo() {
        OtherKind::Fifo
    } else if file_type.is_socket() {
        OtherKind::Socket
    } else {
        OtherKind::Unknown
    }
}

#[cfg(not(unix))]
fn special_kind(_file_type: FileType) -> OtherKind {
    OtherKind::Unknown
}

/// Mode string for stat-ed metadata, e.g. `dr-xr-xr-x` or `-r--r--r--`.
#[cfg(unix)]
pub fn format_mode(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let kind = EntryKind::from_file_type(metadata.file_type());
    format_mode_bits(kind, metadata.permissions().mode())
}

/// Without Unix permission bits only the read-only flag is available.
#[cfg(not(unix))]
pub fn format_mode(metadata: &Metadata) -> String {
    let kind = EntryKind::from_file_type(metadata.file_type());
    let bits = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    format_mode_bits(kind, bits)
}

/// Render permission bits (including setuid, setgid and sticky) after the
/// type character.
pub fn format_mode_bits(kind: EntryKind, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(kind.type_char());

    let classes: [(u32, u32, char); 3] = [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')];
    for (shift, special_bit, special_char) in classes {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(match (mode & special_bit != 0, bits & 0o1 != 0) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_permissions() {
        assert_eq!(format_mode_bits(EntryKind::Regular, 0o644), "-rw-r--r--");
        assert_eq!(format_mode_bits(EntryKind::Regular, 0o444), "-r--r--r--");
        assert_eq!(format_mode_bits(EntryKind::Regular, 0o400), "-r--------");
        assert_eq!(format_mode_bits(EntryKind::Directory, 0o555), "dr-xr-xr-x");
        assert_eq!(format_mode_bits(EntryKind::Directory, 0o000), "d---------");
    }

    #[test]
    fn special_bits() {
        assert_eq!(format_mode_bits(EntryKind::Regular, 0o4755), "-rwsr-xr-x");
        assert_eq!(format_mode_bits(EntryKind::Regular, 0o2644), "-rw-r-Sr--");
        assert_eq!(format_mode_bits(EntryKind::Directory, 0o1777), "drwxrwxrwt");
        assert_eq!(format_mode_bits(EntryKind::Directory, 0o1776), "drwxrwxrwT");
    }

    #[test]
    fn type_characters() {
        let cases = [
            (OtherKind::Symlink, 'l'),
            (OtherKind::CharDevice, 'c'),
            (OtherKind::BlockDevice, 'b'),
            (OtherKind::Fifo, 'p'),
            (OtherKind::Socket, 's'),
            (OtherKind::Unknown, '?'),
        ];
        for (kind, expected) in cases {
            let mode = format_mode_bits(EntryKind::Other(kind), 0o777);
            assert!(mode.starts_with(expected), "{kind:?} -> {mode}");
            assert_eq!(mode.len(), 10);
        }
    }

    #[test]
    fn classifies_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "x").unwrap();

        let file_type = std::fs::metadata(&file).unwrap().file_type();
        assert_eq!(EntryKind::from_file_type(file_type), EntryKind::Regular);

        let dir_type = std::fs::metadata(dir.path()).unwrap().file_type();
        assert_eq!(EntryKind::from_file_type(dir_type), EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn classifies_symlink_from_lstat() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("l");
        std::os::unix::fs::symlink(dir.path(), &link).unwrap();

        let file_type = std::fs::symlink_metadata(&link).unwrap().file_type();
        assert_eq!(
            EntryKind::from_file_type(file_type),
            EntryKind::Other(OtherKind::Symlink)
        );
    }

    #[cfg(unix)]
    #[test]
    fn format_mode_reads_metadata() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "x").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).unwrap();

        let metadata = std::fs::metadata(&file).unwrap();
        assert_eq!(format_mode(&metadata), "-rw-r-----");
    }
}
