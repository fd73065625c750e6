use std::path::PathBuf;

/// Name used for the login entry (registry value / desktop file stem).
const APP_NAME: &str = "ambattery";

type Error = Box<dyn std::error::Error>;

/// Start-on-login capability, kept behind a trait so the tray wiring can be
/// exercised without touching the registry.
pub trait StartupRegistration {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool) -> Result<(), Error>;
    /// Rewrites the entry if the stored path is stale or its target no
    /// longer exists. Safe to call on every start.
    fn repair(&self) -> Result<(), Error>;
}

/// Login entry pointing at the current executable.
pub struct AutoStart {
    exe_path: PathBuf,
}

impl AutoStart {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            exe_path: std::env::current_exe()?,
        })
    }
}

#[cfg(windows)]
mod platform {
    use super::{AutoStart, Error, StartupRegistration, APP_NAME};
    use std::path::Path;
    use std::ptr::null_mut;

    use windows_sys::Win32::System::Registry::{
        RegCloseKey, RegCreateKeyExW, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW,
        RegSetValueExW, HKEY, HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE,
        REG_OPTION_NON_VOLATILE, REG_SZ,
    };

    const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    fn stored_command() -> Option<String> {
        let key_name = wide(RUN_KEY);
        let value_name = wide(APP_NAME);

        unsafe {
            let mut key: HKEY = 0;
            if RegOpenKeyExW(HKEY_CURRENT_USER, key_name.as_ptr(), 0, KEY_QUERY_VALUE, &mut key)
                != 0
            {
                return None;
            }

            let mut size: u32 = 0;
            let status = RegQueryValueExW(
                key,
                value_name.as_ptr(),
                null_mut(),
                null_mut(),
                null_mut(),
                &mut size,
            );
            if status != 0 || size == 0 {
                RegCloseKey(key);
                return None;
            }

            let mut data = vec![0u16; size as usize / 2 + 1];
            let status = RegQueryValueExW(
                key,
                value_name.as_ptr(),
                null_mut(),
                null_mut(),
                data.as_mut_ptr().cast(),
                &mut size,
            );
            RegCloseKey(key);
            if status != 0 {
                return None;
            }

            let len = data.iter().position(|&c| c == 0).unwrap_or(data.len());
            Some(String::from_utf16_lossy(&data[..len]))
        }
    }

    fn write_command(command: &str) -> Result<(), Error> {
        let key_name = wide(RUN_KEY);
        let value_name = wide(APP_NAME);
        let data = wide(command);

        unsafe {
            let mut key: HKEY = 0;
            if RegCreateKeyExW(
                HKEY_CURRENT_USER,
                key_name.as_ptr(),
                0,
                null_mut(),
                REG_OPTION_NON_VOLATILE,
                KEY_SET_VALUE,
                null_mut(),
                &mut key,
                null_mut(),
            ) != 0
            {
                return Err("Could not open the Run registry key".into());
            }

            let status = RegSetValueExW(
                key,
                value_name.as_ptr(),
                0,
                REG_SZ,
                data.as_ptr().cast(),
                (data.len() * 2) as u32,
            );
            RegCloseKey(key);
            if status != 0 {
                return Err("Could not write the startup entry".into());
            }
        }

        Ok(())
    }

    fn delete_command() -> Result<(), Error> {
        let key_name = wide(RUN_KEY);
        let value_name = wide(APP_NAME);

        unsafe {
            let mut key: HKEY = 0;
            if RegOpenKeyExW(HKEY_CURRENT_USER, key_name.as_ptr(), 0, KEY_SET_VALUE, &mut key) != 0
            {
                return Ok(());
            }

            // A missing value is fine, the entry is gone either way.
            RegDeleteValueW(key, value_name.as_ptr());
            RegCloseKey(key);
        }

        Ok(())
    }

    impl AutoStart {
        fn command(&self) -> String {
            format!("\"{}\"", self.exe_path.display())
        }
    }

    impl StartupRegistration for AutoStart {
        fn is_enabled(&self) -> bool {
            stored_command().is_some()
        }

        fn set_enabled(&self, enabled: bool) -> Result<(), Error> {
            if enabled {
                write_command(&self.command())
            } else {
                delete_command()
            }
        }

        fn repair(&self) -> Result<(), Error> {
            let Some(stored) = stored_command() else {
                return Ok(());
            };

            let unquoted = stored.trim_matches('"');
            let path_valid = Path::new(unquoted).exists();
            let path_matches = stored.eq_ignore_ascii_case(&self.command());

            if !path_valid || !path_matches {
                write_command(&self.command())?;
            }
            Ok(())
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::{AutoStart, Error, StartupRegistration, APP_NAME};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn entry_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("autostart").join(format!("{}.desktop", APP_NAME)))
    }

    fn desktop_entry(exe_path: &Path) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Infinity Battery\n\
             Exec={}\n\
             X-GNOME-Autostart-enabled=true\n",
            exe_path.display()
        )
    }

    impl StartupRegistration for AutoStart {
        fn is_enabled(&self) -> bool {
            entry_path().map(|path| path.exists()).unwrap_or(false)
        }

        fn set_enabled(&self, enabled: bool) -> Result<(), Error> {
            let path = entry_path().ok_or("Could not determine autostart directory")?;

            if enabled {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, desktop_entry(&self.exe_path))?;
            } else if let Err(err) = fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    return Err(err.into());
                }
            }

            Ok(())
        }

        fn repair(&self) -> Result<(), Error> {
            let path = entry_path().ok_or("Could not determine autostart directory")?;
            if !path.exists() {
                return Ok(());
            }

            let current = fs::read_to_string(&path).unwrap_or_default();
            if current != desktop_entry(&self.exe_path) {
                fs::write(&path, desktop_entry(&self.exe_path))?;
            }
            Ok(())
        }
    }
}
