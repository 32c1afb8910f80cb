//! The PCL error code table.
//!
//! Every code has a stable numeric value, a symbolic name (`PCL_ENOENT`) and a
//! default message. Network errors live in the `200..300` range.

use std::fmt;
use std::io;

/// First code of the network error range.
pub const NET_START: i32 = 200;
/// End (exclusive) of the network error range.
pub const NET_STOP: i32 = 300;

macro_rules! error_codes {
    ($( $variant:ident = $num:expr, $name:literal, $msg:literal; )*) => {
        /// A PCL error code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        pub enum ErrorCode {
            $( $variant = $num, )*
        }

        impl ErrorCode {
            /// All codes in table order.
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$variant, )*];

            /// The symbolic name, e.g. `PCL_EINVAL`.
            pub fn name(self) -> &'static str {
                match self {
                    $( ErrorCode::$variant => $name, )*
                }
            }

            /// The default message for this code.
            pub fn message(self) -> &'static str {
                match self {
                    $( ErrorCode::$variant => $msg, )*
                }
            }

            /// Looks up a code by numeric value.
            pub fn from_i32(value: i32) -> Option<ErrorCode> {
                match value {
                    $( $num => Some(ErrorCode::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

error_codes! {
    Okay = 0, "PCL_EOKAY", "The operation was successful.";
    TooBig = 1, "PCL_E2BIG", "Arg list too long.";
    Access = 2, "PCL_EACCES", "Access is denied.";
    Again = 3, "PCL_EAGAIN", "Try again.";
    InProgress = 4, "PCL_EINPROGRESS", "Operation is now in progress.";
    Already = 5, "PCL_EALREADY", "Operation is already in progress.";
    BadFd = 6, "PCL_EBADF", "Bad file descriptor.";
    BadCmd = 7, "PCL_EBADCMD", "Invalid request.";
    Busy = 8, "PCL_EBUSY", "Device or resource busy.";
    Cancelled = 9, "PCL_ECANCELLED", "Operation cancelled.";
    Child = 10, "PCL_ECHILD", "No child processes.";
    Deadlock = 11, "PCL_EDEADLK", "Resource deadlock would occur.";
    Quota = 12, "PCL_EDQUOT", "Disc quota exceeded.";
    Exist = 13, "PCL_EEXIST", "Object or resource already exists.";
    Fault = 14, "PCL_EFAULT", "Bad Address.";
    FileTooBig = 15, "PCL_EFBIG", "File too large.";
    IllegalSeq = 16, "PCL_EILSEQ", "Invalid or incomplete multibyte or wide character.";
    Interrupted = 17, "PCL_EINTR", "Interrupted system call.";
    Invalid = 18, "PCL_EINVAL", "Invalid argument.";
    Io = 19, "PCL_EIO", "I/O error.";
    IsDir = 20, "PCL_EISDIR", "Is a directory.";
    Loop = 21, "PCL_ELOOP", "Too many symbolic links.";
    ProcessFiles = 22, "PCL_EMFILE", "Process open file limit has been exceeded.";
    TooManyLinks = 23, "PCL_EMLINK", "Too many hard links to the given file or directory.";
    SystemFiles = 24, "PCL_ENFILE", "System open file limit has been exceeded.";
    NoDevice = 25, "PCL_ENODEV", "No such device.";
    NoEntry = 26, "PCL_ENOENT", "No such file or directory.";
    NoExec = 27, "PCL_ENOEXEC", "Exec format error.";
    NoLocks = 28, "PCL_ENOLCK", "No locks available.";
    NoMemory = 29, "PCL_ENOMEM", "Out of memory.";
    NoProcess = 30, "PCL_ESRCH", "No such process.";
    NoSpace = 31, "PCL_ENOSPC", "No space left on device.";
    NoStream = 32, "PCL_ENOSTR", "Not a stream.";
    NotImplemented = 33, "PCL_ENOIMPL", "Operation/Function not implemented.";
    NotDir = 34, "PCL_ENOTDIR", "Not a directory.";
    NotEmpty = 35, "PCL_ENOTEMPTY", "Directory is not empty.";
    NotSupported = 36, "PCL_ENOTSUP", "Operation not supported.";
    Overflow = 37, "PCL_EOVERFLOW", "Value too large to be stored in data type.";
    Permission = 38, "PCL_EPERM", "Permission denied.";
    BrokenPipe = 39, "PCL_EPIPE", "Broken pipe.";
    ProcessLimit = 40, "PCL_EPROCLIM", "Too many processes.";
    Range = 41, "PCL_ERANGE", "Math result not representable.";
    ReadOnlyFs = 42, "PCL_EROFS", "Read-only file system.";
    IllegalSeek = 43, "PCL_ESPIPE", "Illegal seek.";
    CrossDevice = 45, "PCL_EXDEV", "Cross-device operation not permitted.";
    NameTooLong = 46, "PCL_ENAMETOOLONG", "Name is too long.";
    Index = 47, "PCL_EINDEX", "Invalid index.";
    Buffer = 48, "PCL_EBUF", "Buffer too small.";
    Format = 49, "PCL_EFORMAT", "Invalid or corrupt format.";
    Type = 50, "PCL_ETYPE", "Invalid type.";
    NoMore = 51, "PCL_ENOMORE", "No more items.";
    NotReady = 52, "PCL_ENOTREADY", "Device or resource is not ready or initialized.";
    Path = 53, "PCL_EPATH", "Invalid pathname.";
    Undefined = 54, "PCL_EUNDEF", "Undefined error occurred.";
    NotFound = 55, "PCL_ENOTFOUND", "Object or resource not found.";
    Eof = 56, "PCL_EOF", "End of file.";
    Crypt = 57, "PCL_ECRYPT", "Encryption or decryption failed.";
    Timeout = 58, "PCL_ETIMEOUT", "Operation timed out.";
    Auth = 69, "PCL_EAUTH", "Authentication error.";
    Version = 70, "PCL_EVERSION", "Version conflict.";
    Restart = 71, "PCL_ERESTART", "Interrupted system call should be restarted";
    NoLink = 72, "PCL_ENOLINK", "Link has been severed.";
    DeviceError = 73, "PCL_EDEVERR", "Device error.";
    LibMax = 74, "PCL_ELIBMAX", "Attempting to link in too many shared libraries.";
    NoStreamResources = 75, "PCL_ENOSR", "Out of streams resources";
    Unavailable = 76, "PCL_EUNAVAIL", "Object or resource is unavailable.";
    Expired = 77, "PCL_EEXPIRED", "Object or resource has expired.";
    Rejected = 78, "PCL_EREJECTED", "Object or resource has been rejected.";
    Revoked = 79, "PCL_EREVOKED", "Object or resource has been revoked.";
    Disabled = 80, "PCL_EDISABLED", "Object or resource has been disabled.";
    Sync = 81, "PCL_ESYNC", "Out of sync.";
    Database = 82, "PCL_EDB", "Database error.";
    Locked = 83, "PCL_ELOCK", "The resource is currently locked.";
    Abort = 84, "PCL_EABORT", "The operation has been aborted.";
    Digest = 85, "PCL_EDIGEST", "Message digest failure.";
    Security = 86, "PCL_ESECURITY", "Security violation.";
    Moved = 87, "PCL_EMOVED", "Object or resource has moved.";
    Class = 88, "PCL_ECLASS", "Object is not an instance of class.";
    Ssl = 89, "PCL_ESSL", "SSL error.";
    Sequence = 90, "PCL_ESEQ", "Out of sequence.";
    Syntax = 91, "PCL_ESYNTAX", "Syntax error.";
    BadHandle = 92, "PCL_EBADH", "Bad handle value.";
    DatabaseQuery = 93, "PCL_EDBQUERY", "Database query error.";
    InvalidCodepoint = 94, "PCL_EINVCODEPT", "Invalid unicode codepoint.";

    AddrInUse = 200, "PCL_EADDRINUSE", "The internet address is already in use.";
    AddrNotAvailable = 201, "PCL_EADDRNOTAVAIL", "Can't assign the requested internet address.";
    AfNoSupport = 202, "PCL_EAFNOSUPPORT", "Internet address family not supported by protocol family.";
    ConnAborted = 203, "PCL_ECONNABORTED", "Software caused connection abort.";
    ConnRefused = 204, "PCL_ECONNREFUSED", "Connection refused.";
    ConnReset = 205, "PCL_ECONNRESET", "Connection reset by peer.";
    DestAddrRequired = 206, "PCL_EDESTADDRREQ", "Destination internet address required.";
    HostDown = 207, "PCL_EHOSTDOWN", "Host is down.";
    HostUnreachable = 208, "PCL_EHOSTUNREACH", "No route to host.";
    IsConnected = 209, "PCL_EISCONN", "Socket is already connected.";
    MsgSize = 210, "PCL_EMSGSIZE", "Message too long.";
    MultiHop = 211, "PCL_EMULTIHOP", "Hopping to multiple remote machines is prohibited.";
    NetDown = 212, "PCL_ENETDOWN", "Network is down.";
    NetReset = 213, "PCL_ENETRESET", "Network dropped connection on reset.";
    NetUnreachable = 214, "PCL_ENETUNREACH", "Network is unreachable.";
    NoBuffers = 215, "PCL_ENOBUFS", "No buffer space available.";
    NoProtoOpt = 216, "PCL_ENOPROTOOPT", "Protocol not available.";
    NotConnected = 217, "PCL_ENOTCONN", "Socket is not connected.";
    NotSocket = 218, "PCL_ENOTSOCK", "A socket operation was attempted on a non-socket.";
    OpNotSupported = 219, "PCL_EOPNOTSUPP", "Operation not supported.";
    PfNoSupport = 220, "PCL_EPFNOSUPPORT", "Protocol family not supported.";
    Proto = 221, "PCL_EPROTO", "Protocol not supported.";
    ProtoNoSupport = 222, "PCL_EPROTONOSUPPORT", "Protocol error.";
    ProtoType = 223, "PCL_EPROTOTYPE", "Protocol wrong type for socket.";
    Remote = 224, "PCL_EREMOTE", "Too many levels of remote in path.";
    Shutdown = 225, "PCL_ESHUTDOWN", "Can't send after socket shutdown.";
    SockTypeNoSupport = 226, "PCL_ESOCKTNOSUPPORT", "Socket type not supported.";
    Stale = 227, "PCL_ESTALE", "Stale remote resource, such as an NFS file.";
    TooManyRefs = 228, "PCL_ETOOMANYREFS", "Too many references, can't splice.";
    Users = 229, "PCL_EUSERS", "Too many users.";
    HostNotFound = 230, "PCL_EHOSTNOTFOUND", "Authoritative Answer: Host not found.";
    TryAgain = 231, "PCL_ETRYAGAIN", "Non-Authoritative: Host not found or SERVERFAIL.";
    NoRecovery = 232, "PCL_ENORECOVERY", "Non recoverable errors, FORMERR, REFUSED, NOTIMP.";
    NoData = 233, "PCL_ENODATA", "The requested name is valid but does not have an IP address.";
    NoAddress = 234, "PCL_ENOADDRESS", "No address, look for MX record.";
    Comm = 235, "PCL_ECOMM", "Communication error on send.";
    NoNet = 236, "PCL_ENONET", "Machine is not on the network.";
    NotUnique = 237, "PCL_ENOTUNIQ", "Name not unique on network.";
    RemoteChanged = 238, "PCL_EREMCHG", "Remote address changed.";
    RemoteIo = 239, "PCL_EREMOTEIO", "Remote I/O error.";
}

impl ErrorCode {
    /// `PCL_EWOULDBLOCK` shares its value with `PCL_EAGAIN`.
    pub const WOULD_BLOCK: ErrorCode = ErrorCode::Again;

    /// The numeric value of this code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a code by its symbolic name. The `PCL_` prefix is optional and the
    /// match is case-insensitive.
    pub fn from_name(name: &str) -> Option<ErrorCode> {
        let name = name.trim();
        let bare = match name.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("PCL_") => &name[4..],
            _ => name,
        };
        if bare.eq_ignore_ascii_case("EWOULDBLOCK") {
            return Some(ErrorCode::WOULD_BLOCK);
        }
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.name()[4..].eq_ignore_ascii_case(bare))
    }

    /// Network errors, excluding `EAGAIN` but including `EPIPE`.
    pub fn is_net(self) -> bool {
        let value = self.code();
        (NET_START..NET_STOP).contains(&value) || self == ErrorCode::BrokenPipe
    }

    /// Maps an OS error kind to the closest PCL code.
    pub fn from_io_kind(kind: io::ErrorKind) -> ErrorCode {
        use io::ErrorKind as K;
        match kind {
            K::NotFound => ErrorCode::NoEntry,
            K::PermissionDenied => ErrorCode::Access,
            K::ConnectionRefused => ErrorCode::ConnRefused,
            K::ConnectionReset => ErrorCode::ConnReset,
            K::HostUnreachable => ErrorCode::HostUnreachable,
            K::NetworkUnreachable => ErrorCode::NetUnreachable,
            K::ConnectionAborted => ErrorCode::ConnAborted,
            K::NotConnected => ErrorCode::NotConnected,
            K::AddrInUse => ErrorCode::AddrInUse,
            K::AddrNotAvailable => ErrorCode::AddrNotAvailable,
            K::NetworkDown => ErrorCode::NetDown,
            K::BrokenPipe => ErrorCode::BrokenPipe,
            K::AlreadyExists => ErrorCode::Exist,
            K::WouldBlock => ErrorCode::Again,
            K::NotADirectory => ErrorCode::NotDir,
            K::IsADirectory => ErrorCode::IsDir,
            K::DirectoryNotEmpty => ErrorCode::NotEmpty,
            K::ReadOnlyFilesystem => ErrorCode::ReadOnlyFs,
            K::StaleNetworkFileHandle => ErrorCode::Stale,
            K::InvalidInput => ErrorCode::Invalid,
            K::InvalidData => ErrorCode::Format,
            K::TimedOut => ErrorCode::Timeout,
            K::WriteZero => ErrorCode::Io,
            K::StorageFull => ErrorCode::NoSpace,
            K::NotSeekable => ErrorCode::IllegalSeek,
            K::FileTooLarge => ErrorCode::FileTooBig,
            K::ResourceBusy | K::ExecutableFileBusy => ErrorCode::Busy,
            K::Deadlock => ErrorCode::Deadlock,
            K::CrossesDevices => ErrorCode::CrossDevice,
            K::TooManyLinks => ErrorCode::TooManyLinks,
            K::InvalidFilename => ErrorCode::Path,
            K::ArgumentListTooLong => ErrorCode::TooBig,
            K::Interrupted => ErrorCode::Interrupted,
            K::Unsupported => ErrorCode::NotSupported,
            K::UnexpectedEof => ErrorCode::Eof,
            K::OutOfMemory => ErrorCode::NoMemory,
            _ => ErrorCode::Undefined,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name(), self.message())
    }
}
