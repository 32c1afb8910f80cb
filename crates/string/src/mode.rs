const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;
const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

/// Renders a file mode the way `ls -l` does, e.g. `drwxr-xr-x`.
///
/// The sticky bit shows as `t`/`T` depending on the owner's execute bit.
pub fn strmode(mode: u32) -> String {
    let kind = match mode & S_IFMT {
        S_IFDIR => 'd',
        S_IFREG => '-',
        S_IFLNK => 'l',
        S_IFBLK => 'b',
        S_IFCHR => 'c',
        S_IFIFO => 'p',
        S_IFSOCK => 's',
        _ => '?',
    };
    let bit = |mask: u32, c: char| if mode & mask != 0 { c } else { '-' };
    let special = |flag: u32, exec: u32, set: char, unset: char, plain: char| {
        match (mode & flag != 0, mode & exec != 0) {
            (true, true) => set,
            (true, false) => unset,
            (false, true) => plain,
            (false, false) => '-',
        }
    };

    [
        kind,
        bit(0o400, 'r'),
        bit(0o200, 'w'),
        special(S_ISUID, 0o100, 's', 'S', 'x'),
        bit(0o040, 'r'),
        bit(0o020, 'w'),
        special(S_ISGID, 0o010, 's', 'S', 'x'),
        bit(0o004, 'r'),
        bit(0o002, 'w'),
        if mode & S_ISVTX != 0 {
            if mode & 0o100 != 0 { 't' } else { 'T' }
        } else {
            bit(0o001, 'x')
        },
    ]
    .iter()
    .collect()
}
