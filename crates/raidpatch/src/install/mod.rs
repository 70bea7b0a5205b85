//! Steam and game installation discovery.
//!
//! Lookup order for the Steam root: explicit override, the
//! `HKCU\Software\Valve\Steam\SteamPath` registry value, then the default
//! install directories. Libraries come from `steamapps/libraryfolders.vdf`,
//! and the game is found through its app manifest with a plain folder scan
//! as fallback.

use std::fs;
use std::path::{Path, PathBuf};

use keyvalues_parser::{Obj, Vdf};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::RaidpatchConfig;
use crate::error::{Error, Result};

pub const DBFZ_APP_ID: &str = "678950";
pub const GAME_FOLDER_NAME: &str = "DRAGON BALL FighterZ";
pub const CLEAN_EXE_NAME: &str = "RED-Win64-Shipping.exe";
pub const PATCHED_EXE_NAME: &str = "RED-Win64-Shipping-eac-nop-loaded.exe";

const DEFAULT_STEAM_PATHS: [&str; 2] = [r"C:\Program Files (x86)\Steam", r"C:\Program Files\Steam"];

/// Library roots scanned directly when Steam discovery comes up empty
pub const COMMON_LIBRARY_ROOTS: [&str; 6] = [
    r"C:\Program Files (x86)\Steam",
    r"C:\Program Files\Steam",
    r"D:\SteamLibrary",
    r"D:\Steam",
    r"E:\SteamLibrary",
    r"E:\Steam",
];

/// Files the patch workflow touches inside a game installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GamePaths {
    pub game_root: PathBuf,
    pub exe_dir: PathBuf,
    /// Original executable, never modified
    pub clean_exe: PathBuf,
    /// Working copy that receives the patches
    pub patched_exe: PathBuf,
    pub eac_setup: PathBuf,
}

impl GamePaths {
    pub fn new(game_root: &Path) -> Self {
        let exe_dir = game_root.join("RED").join("Binaries").join("Win64");
        Self {
            game_root: game_root.to_path_buf(),
            clean_exe: exe_dir.join(CLEAN_EXE_NAME),
            patched_exe: exe_dir.join(PATCHED_EXE_NAME),
            eac_setup: game_root
                .join("EasyAntiCheat")
                .join("EasyAntiCheat_Setup.exe"),
            exe_dir,
        }
    }

    /// Check that the binaries directory and the clean executable exist.
    pub fn validate(&self) -> Result<()> {
        if !self.exe_dir.is_dir() {
            error!("Binaries directory not found: {}", self.exe_dir.display());
            return Err(Error::InvalidInstallation {
                root: self.game_root.clone(),
                reason: format!("missing {}", self.exe_dir.display()),
            });
        }
        if !self.clean_exe.is_file() {
            error!("Game executable not found: {}", self.clean_exe.display());
            return Err(Error::InvalidInstallation {
                root: self.game_root.clone(),
                reason: format!("missing {}", self.clean_exe.display()),
            });
        }
        Ok(())
    }
}

/// Locates the game through Steam.
#[derive(Debug, Clone)]
pub struct GameLocator {
    steam_override: Option<PathBuf>,
    game_root_override: Option<PathBuf>,
    fallback_roots: Vec<PathBuf>,
}

impl Default for GameLocator {
    fn default() -> Self {
        Self {
            steam_override: None,
            game_root_override: None,
            fallback_roots: COMMON_LIBRARY_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl GameLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RaidpatchConfig) -> Self {
        Self {
            steam_override: config.steam_path.clone(),
            game_root_override: config.game_root.clone(),
            ..Self::default()
        }
    }

    pub fn with_steam_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.steam_override = Some(path.into());
        self
    }

    pub fn with_game_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.game_root_override = Some(path.into());
        self
    }

    /// Replace the library roots scanned when Steam discovery fails.
    pub fn with_fallback_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.fallback_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn find_steam_installation(&self) -> Result<PathBuf> {
        if let Some(path) = &self.steam_override {
            if path.is_dir() {
                info!("Using configured Steam path: {}", path.display());
                return Ok(path.clone());
            }
            warn!("Configured Steam path does not exist: {}", path.display());
        }

        match steam_path_from_registry() {
            Some(path) if path.is_dir() => {
                info!("Found Steam via registry: {}", path.display());
                return Ok(path);
            }
            Some(path) => debug!("Registry Steam path does not exist: {}", path.display()),
            None => debug!("Steam path not found in registry"),
        }

        for path in DEFAULT_STEAM_PATHS.iter().map(PathBuf::from) {
            if path.is_dir() {
                info!("Found Steam at default path: {}", path.display());
                return Ok(path);
            }
        }

        Err(Error::SteamNotFound)
    }

    /// All Steam library roots, starting with the Steam installation itself.
    pub fn library_paths(&self) -> Result<Vec<PathBuf>> {
        let steam = self.find_steam_installation()?;
        Ok(parse_library_folders(&steam))
    }

    /// Resolve and validate the game installation.
    pub fn find_and_validate(&self) -> Result<GamePaths> {
        let game_root = match &self.game_root_override {
            Some(root) => root.clone(),
            None => self.discover_game_root()?,
        };

        let paths = GamePaths::new(&game_root);
        paths.validate()?;
        Ok(paths)
    }

    /// Steam libraries first, then a folder scan of the common library roots.
    fn discover_game_root(&self) -> Result<PathBuf> {
        let from_steam = match self.library_paths() {
            Ok(libraries) => find_game_root(&libraries),
            Err(Error::SteamNotFound) => {
                warn!("Steam installation not found");
                None
            }
            Err(e) => return Err(e),
        };
        if let Some(root) = from_steam {
            return Ok(root);
        }

        warn!("Game not found in Steam libraries, checking common paths");
        find_game_via_folder_scan(&self.fallback_roots).ok_or(Error::GameNotFound)
    }
}

#[cfg(target_os = "windows")]
fn steam_path_from_registry() -> Option<PathBuf> {
    use windows::Win32::System::Registry::{HKEY_CURRENT_USER, RRF_RT_REG_SZ, RegGetValueW};
    use windows::core::HSTRING;

    let subkey = HSTRING::from(r"Software\Valve\Steam");
    let value_name = HSTRING::from("SteamPath");

    let mut size: u32 = 0;
    // SAFETY: RegGetValueW with null buffer queries the required size.
    unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            &subkey,
            &value_name,
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size),
        )
        .ok()
        .ok()?;
    }

    let mut buffer = vec![0u16; (size as usize) / 2];
    // SAFETY: RegGetValueW reads the registry value into the provided buffer.
    unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            &subkey,
            &value_name,
            RRF_RT_REG_SZ,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size),
        )
        .ok()
        .ok()?;
    }

    // Trim null terminator
    while buffer.last() == Some(&0) {
        buffer.pop();
    }

    String::from_utf16(&buffer).ok().map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn steam_path_from_registry() -> Option<PathBuf> {
    None
}

fn parse_vdf(content: &str) -> Result<Vdf<'_>> {
    Vdf::parse(content).map_err(|e| Error::Vdf(Box::new(e)))
}

/// First string value stored under `key`
fn first_str<'a>(obj: &'a Obj<'_>, key: &str) -> Option<&'a str> {
    obj.get(key)?.first()?.get_str()
}

/// Read `steamapps/libraryfolders.vdf`; parse failures fall back to the
/// Steam root alone.
pub fn parse_library_folders(steam_path: &Path) -> Vec<PathBuf> {
    let mut libraries = vec![steam_path.to_path_buf()];
    let vdf_path = steam_path.join("steamapps").join("libraryfolders.vdf");

    let content = match fs::read_to_string(&vdf_path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                "libraryfolders.vdf not readable ({}), using main Steam path only",
                e
            );
            return libraries;
        }
    };

    let vdf = match parse_vdf(&content) {
        Ok(vdf) => vdf,
        Err(e) => {
            error!("Failed to parse libraryfolders.vdf: {}", e);
            return libraries;
        }
    };

    if !vdf.key.eq_ignore_ascii_case("libraryfolders") {
        warn!("Unexpected libraryfolders.vdf root key: {}", vdf.key);
        return libraries;
    }

    let folders = vdf.value.get_obj().into_iter().flat_map(|obj| obj.values());
    for entry in folders.flatten().filter_map(|value| value.get_obj()) {
        let Some(path) = first_str(entry, "path") else {
            continue;
        };
        let path = PathBuf::from(path);
        if path.is_dir() && !libraries.contains(&path) {
            libraries.push(path);
        }
    }

    info!("Found {} Steam libraries", libraries.len());
    libraries
}

/// Find the game root across libraries, via app manifest first.
pub fn find_game_root(libraries: &[PathBuf]) -> Option<PathBuf> {
    find_game_via_manifest(libraries).or_else(|| find_game_via_folder_scan(libraries))
}

fn find_game_via_manifest(libraries: &[PathBuf]) -> Option<PathBuf> {
    let manifest_name = format!("appmanifest_{}.acf", DBFZ_APP_ID);

    for library in libraries {
        let manifest_path = library.join("steamapps").join(&manifest_name);
        let content = match fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(_) => continue,
        };

        let manifest = match parse_vdf(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                error!(
                    "Failed to parse manifest {}: {}",
                    manifest_path.display(),
                    e
                );
                continue;
            }
        };

        let install_dir = manifest
            .value
            .get_obj()
            .and_then(|state| first_str(state, "installdir"))
            .unwrap_or(GAME_FOLDER_NAME);
        let game_root = library.join("steamapps").join("common").join(install_dir);

        if GamePaths::new(&game_root).clean_exe.is_file() {
            info!("Found DBFZ via manifest: {}", game_root.display());
            return Some(game_root);
        }
        warn!(
            "Manifest found but executable missing under {}",
            game_root.display()
        );
    }

    None
}

fn find_game_via_folder_scan(libraries: &[PathBuf]) -> Option<PathBuf> {
    libraries
        .iter()
        .map(|library| {
            library
                .join("steamapps")
                .join("common")
                .join(GAME_FOLDER_NAME)
        })
        .find(|root| GamePaths::new(root).clean_exe.is_file())
        .inspect(|root| info!("Found DBFZ via folder scan: {}", root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn install_game(root: &Path) {
        let paths = GamePaths::new(root);
        fs::create_dir_all(&paths.exe_dir).unwrap();
        fs::write(&paths.clean_exe, b"MZ").unwrap();
    }

    #[test]
    fn test_game_paths_layout() {
        let paths = GamePaths::new(Path::new("/games/DBFZ"));
        assert_eq!(
            paths.clean_exe,
            Path::new("/games/DBFZ/RED/Binaries/Win64/RED-Win64-Shipping.exe")
        );
        assert_eq!(
            paths.patched_exe,
            Path::new("/games/DBFZ/RED/Binaries/Win64/RED-Win64-Shipping-eac-nop-loaded.exe")
        );
        assert_eq!(
            paths.eac_setup,
            Path::new("/games/DBFZ/EasyAntiCheat/EasyAntiCheat_Setup.exe")
        );
    }

    #[test]
    fn test_validate_missing_exe() {
        let dir = tempdir().unwrap();
        let paths = GamePaths::new(dir.path());
        assert!(matches!(
            paths.validate(),
            Err(Error::InvalidInstallation { .. })
        ));

        install_game(dir.path());
        assert!(paths.validate().is_ok());
    }

    #[test]
    fn test_library_folders_fallback_without_vdf() {
        let steam = tempdir().unwrap();
        assert_eq!(
            parse_library_folders(steam.path()),
            vec![steam.path().to_path_buf()]
        );
    }

    #[test]
    fn test_library_folders_parsed() {
        let steam = tempdir().unwrap();
        let extra = tempdir().unwrap();
        fs::create_dir_all(steam.path().join("steamapps")).unwrap();

        let vdf = format!(
            "\"libraryfolders\"\n{{\n\"0\" {{ \"path\" \"{}\" }}\n\"1\" {{ \"path\" \"{}\" }}\n\"2\" {{ \"path\" \"{}\" }}\n}}\n",
            steam.path().display(),
            extra.path().display(),
            steam.path().join("gone").display(),
        )
        .replace('\\', "\\\\");
        fs::write(steam.path().join("steamapps/libraryfolders.vdf"), vdf).unwrap();

        let libraries = parse_library_folders(steam.path());
        assert_eq!(
            libraries,
            vec![steam.path().to_path_buf(), extra.path().to_path_buf()]
        );
    }

    #[test]
    fn test_find_game_via_manifest() {
        let library = tempdir().unwrap();
        let steamapps = library.path().join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        fs::write(
            steamapps.join("appmanifest_678950.acf"),
            "\"AppState\"\n{\n\t\"appid\"\t\"678950\"\n\t\"installdir\"\t\"DBFZ Custom\"\n}\n",
        )
        .unwrap();
        let game_root = steamapps.join("common").join("DBFZ Custom");
        install_game(&game_root);

        assert_eq!(
            find_game_root(&[library.path().to_path_buf()]),
            Some(game_root)
        );
    }

    #[test]
    fn test_find_game_via_folder_scan() {
        let empty = tempdir().unwrap();
        let library = tempdir().unwrap();
        let game_root = library
            .path()
            .join("steamapps")
            .join("common")
            .join(GAME_FOLDER_NAME);
        install_game(&game_root);

        let libraries = vec![empty.path().to_path_buf(), library.path().to_path_buf()];
        assert_eq!(find_game_root(&libraries), Some(game_root));
    }

    #[test]
    fn test_find_and_validate_with_overrides() {
        let steam = tempdir().unwrap();
        let game_root = steam
            .path()
            .join("steamapps")
            .join("common")
            .join(GAME_FOLDER_NAME);
        install_game(&game_root);

        let located = GameLocator::new()
            .with_steam_path(steam.path())
            .find_and_validate()
            .unwrap();
        assert_eq!(located.game_root, game_root);

        let direct = GameLocator::new()
            .with_game_root(&game_root)
            .find_and_validate()
            .unwrap();
        assert_eq!(direct, located);
    }

    #[test]
    fn test_find_and_validate_game_missing() {
        let steam = tempdir().unwrap();
        let err = GameLocator::new()
            .with_steam_path(steam.path())
            .with_fallback_roots(Vec::<PathBuf>::new())
            .find_and_validate()
            .unwrap_err();
        assert!(matches!(err, Error::GameNotFound));
    }

    #[test]
    fn test_find_and_validate_falls_back_to_common_roots() {
        let steam = tempdir().unwrap();
        let empty = tempdir().unwrap();
        let library = tempdir().unwrap();
        let game_root = library
            .path()
            .join("steamapps")
            .join("common")
            .join(GAME_FOLDER_NAME);
        install_game(&game_root);

        let located = GameLocator::new()
            .with_steam_path(steam.path())
            .with_fallback_roots([empty.path(), library.path()])
            .find_and_validate()
            .unwrap();
        assert_eq!(located.game_root, game_root);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_find_and_validate_without_steam_uses_common_roots() {
        let missing = tempdir().unwrap();
        let library = tempdir().unwrap();
        let game_root = library
            .path()
            .join("steamapps")
            .join("common")
            .join(GAME_FOLDER_NAME);
        install_game(&game_root);

        let locator = GameLocator::new()
            .with_steam_path(missing.path().join("Steam"))
            .with_fallback_roots([library.path()]);
        assert!(matches!(
            locator.find_steam_installation(),
            Err(Error::SteamNotFound)
        ));
        assert_eq!(locator.find_and_validate().unwrap().game_root, game_root);
    }

    #[test]
    fn test_default_fallback_roots() {
        let locator = GameLocator::new();
        assert_eq!(locator.fallback_roots.len(), COMMON_LIBRARY_ROOTS.len());
        assert_eq!(
            locator.fallback_roots[2],
            PathBuf::from(r"D:\SteamLibrary")
        );
    }

    #[test]
    fn test_parse_vdf_error_is_wrapped() {
        assert!(matches!(
            parse_vdf("\"libraryfolders\"\n{\n\"0\""),
            Err(Error::Vdf(_))
        ));
    }

    #[test]
    fn test_library_folders_malformed_vdf() {
        let steam = tempdir().unwrap();
        fs::create_dir_all(steam.path().join("steamapps")).unwrap();
        fs::write(
            steam.path().join("steamapps/libraryfolders.vdf"),
            "\"libraryfolders\"\n{\n\"0\"\n{\n",
        )
        .unwrap();

        assert_eq!(
            parse_library_folders(steam.path()),
            vec![steam.path().to_path_buf()]
        );
    }

    #[test]
    fn test_manifest_without_installdir_uses_default_folder() {
        let library = tempdir().unwrap();
        let steamapps = library.path().join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        fs::write(
            steamapps.join("appmanifest_678950.acf"),
            "\"AppState\"\n{\n\t\"appid\"\t\"678950\"\n}\n",
        )
        .unwrap();
        let game_root = steamapps.join("common").join(GAME_FOLDER_NAME);
        install_game(&game_root);

        assert_eq!(
            find_game_via_manifest(&[library.path().to_path_buf()]),
            Some(game_root)
        );
    }
}
