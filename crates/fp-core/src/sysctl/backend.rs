//! Raw probing backends.

use std::io;

/// Raw, size-probing attribute interface.
///
/// With `buf == None` the call reports the number of bytes the value needs.
/// With a buffer it copies the value and returns the number of bytes written,
/// failing with `ENOMEM` if the buffer is too small.
pub trait SysctlBackend {
    fn read(&self, path: &[i32], buf: Option<&mut [u8]>) -> io::Result<usize>;
}

impl<T: SysctlBackend + ?Sized> SysctlBackend for &T {
    fn read(&self, path: &[i32], buf: Option<&mut [u8]>) -> io::Result<usize> {
        (**self).read(path, buf)
    }
}

/// `sysctl(3)` through libc.
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSysctl;

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
impl SysctlBackend for NativeSysctl {
    fn read(&self, path: &[i32], buf: Option<&mut [u8]>) -> io::Result<usize> {
        let mut name = path.to_vec();
        let (old, mut len) = match buf {
            Some(buf) => (buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()),
            None => (std::ptr::null_mut(), 0),
        };

        // SAFETY: `name` outlives the call and its length is passed alongside.
        // `old` is either null (size probe) or points to `len` writable bytes.
        let rc = unsafe {
            libc::sysctl(
                name.as_mut_ptr(),
                name.len() as libc::c_uint,
                old,
                &mut len,
                std::ptr::null_mut(),
                0,
            )
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(len)
    }
}

/// Backend for platforms with no attribute interface; every probe fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSysctl;

impl SysctlBackend for UnsupportedSysctl {
    fn read(&self, _path: &[i32], _buf: Option<&mut [u8]>) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "attribute queries are not supported on this platform",
        ))
    }
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
pub type DefaultBackend = NativeSysctl;

#[cfg(target_os = "linux")]
pub type DefaultBackend = super::ProcfsSysctl;

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "linux"
)))]
pub type DefaultBackend = UnsupportedSysctl;

/// Backend for the running platform.
pub fn default_backend() -> DefaultBackend {
    DefaultBackend::default()
}
