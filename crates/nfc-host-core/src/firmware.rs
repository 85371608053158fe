//! Firmware currency check and update.
//!
//! The controller firmware is considered current when the modification time
//! of the on-disk image equals the one recorded after the last successful
//! download. Otherwise the image is pushed again, up to
//! [`MAX_FIRMWARE_DOWNLOAD_ATTEMPTS`] times, and the record is only moved
//! forward once the controller confirmed a download.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, instrument, warn};

use crate::driver::ControllerDriver;
use crate::error::HostError;
use crate::prefs::PreferenceStore;
use crate::protocol::{
    FIRMWARE_MODTIME_DEFAULT, MAX_FIRMWARE_DOWNLOAD_ATTEMPTS, PREF_FIRMWARE_MODTIME,
    PREF_NAMESPACE,
};
use crate::state::ControllerState;

/// Vendor firmware image on disk. Only its modification time is ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareArtifact {
    path: PathBuf,
}

impl FirmwareArtifact {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time in milliseconds since the Unix epoch.
    pub fn modified_millis(&self) -> io::Result<i64> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        Ok(system_time_to_millis(modified))
    }
}

fn system_time_to_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}

/// Snapshot of the firmware currency inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareRecord {
    pub file_path: PathBuf,
    /// Read fresh from the artifact.
    pub current_mod_time: i64,
    /// Last confirmed download, `None` if there never was one.
    pub persisted_mod_time: Option<i64>,
}

impl FirmwareRecord {
    /// Read both timestamps. Fails if the artifact can't be stat'ed.
    pub fn read<S: PreferenceStore + ?Sized>(
        artifact: &FirmwareArtifact,
        store: &S,
    ) -> Result<Self, HostError> {
        let current_mod_time =
            artifact
                .modified_millis()
                .map_err(|source| HostError::FirmwareCheck {
                    path: artifact.path().to_path_buf(),
                    source,
                })?;

        let persisted =
            store.get_long(PREF_NAMESPACE, PREF_FIRMWARE_MODTIME, FIRMWARE_MODTIME_DEFAULT);
        let persisted_mod_time = (persisted != FIRMWARE_MODTIME_DEFAULT).then_some(persisted);

        Ok(Self {
            file_path: artifact.path().to_path_buf(),
            current_mod_time,
            persisted_mod_time,
        })
    }

    pub fn is_current(&self) -> bool {
        self.persisted_mod_time == Some(self.current_mod_time)
    }
}

/// Successful outcome of a currency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareStatus {
    /// Timestamps matched; the controller was not contacted.
    Current,
    /// Firmware downloaded; `attempts` includes the successful one.
    Updated { attempts: u32 },
}

/// Check that the controller firmware is current, downloading it if not.
///
/// Blocking; may take several seconds per attempt. Concurrent checks against
/// the same store are not supported.
#[instrument(skip_all, fields(path = %artifact.path().display()))]
pub fn check_firmware<D, S>(
    driver: &mut D,
    store: &mut S,
    artifact: &FirmwareArtifact,
    state: &mut ControllerState,
) -> Result<FirmwareStatus, HostError>
where
    D: ControllerDriver + ?Sized,
    S: PreferenceStore + ?Sized,
{
    let record = FirmwareRecord::read(artifact, store)?;
    debug!(
        previous = ?record.persisted_mod_time,
        current = record.current_mod_time,
        "Firmware modification times"
    );

    if record.is_current() {
        return Ok(FirmwareStatus::Current);
    }

    let previous_state = *state;
    state.goto(ControllerState::Downloading);

    for attempt in 1..=MAX_FIRMWARE_DOWNLOAD_ATTEMPTS {
        debug!(attempt, "Performing firmware download");
        if driver.download_firmware() {
            info!(attempt, "Firmware download succeeded");
            if let Err(e) = store.put_long(
                PREF_NAMESPACE,
                PREF_FIRMWARE_MODTIME,
                record.current_mod_time,
            ) {
                // The controller has the image; the next check just downloads again.
                warn!(error = %e, "Failed to persist firmware modification time");
            }
            state.goto(ControllerState::Ready);
            return Ok(FirmwareStatus::Updated { attempts: attempt });
        }
        debug!(attempt, "Firmware download failed");
    }

    warn!(
        attempts = MAX_FIRMWARE_DOWNLOAD_ATTEMPTS,
        "Giving up on firmware download"
    );
    state.goto(previous_state);
    Err(HostError::FirmwareDownloadExhausted {
        attempts: MAX_FIRMWARE_DOWNLOAD_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverCommand, SimulatedDriver};
    use crate::error::PrefsError;
    use crate::prefs::MemoryPreferenceStore;
    use std::fs::File;
    use std::time::Duration;

    fn artifact_with_mtime(dir: &tempfile::TempDir, millis: u64) -> FirmwareArtifact {
        let path = dir.path().join("libpn544_fw.so");
        let file = File::create(&path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_millis(millis))
            .unwrap();
        FirmwareArtifact::new(path)
    }

    fn store_with(persisted: i64) -> MemoryPreferenceStore {
        let mut store = MemoryPreferenceStore::new();
        store
            .put_long(PREF_NAMESPACE, PREF_FIRMWARE_MODTIME, persisted)
            .unwrap();
        store
    }

    /// Store that reads a fixed value and rejects every write.
    struct ReadOnlyStore(i64);

    impl PreferenceStore for ReadOnlyStore {
        fn get_long(&self, _namespace: &str, _key: &str, _default: i64) -> i64 {
            self.0
        }

        fn put_long(
            &mut self,
            _namespace: &str,
            _key: &str,
            _value: i64,
        ) -> Result<(), PrefsError> {
            Err(PrefsError::Io(io::Error::other("read-only")))
        }
    }

    fn persisted(store: &MemoryPreferenceStore) -> i64 {
        store.get_long(
            PREF_NAMESPACE,
            PREF_FIRMWARE_MODTIME,
            FIRMWARE_MODTIME_DEFAULT,
        )
    }

    #[test]
    fn test_current_firmware_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_with_mtime(&dir, 1000);
        let mut store = store_with(1000);
        let sim = SimulatedDriver::new();
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        let status = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap();

        assert_eq!(status, FirmwareStatus::Current);
        assert!(sim.commands().is_empty());
        assert_eq!(state, ControllerState::Uninitialized);
    }

    #[test]
    fn test_all_attempts_fail() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_with_mtime(&dir, 2000);
        let mut store = store_with(1000);
        let sim = SimulatedDriver::new();
        sim.set_download_default(false);
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        let err = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap_err();

        assert!(matches!(
            err,
            HostError::FirmwareDownloadExhausted { attempts: 5 }
        ));
        assert_eq!(sim.download_count(), 5);
        assert_eq!(persisted(&store), 1000);
        // Downloading never leaks out
        assert_eq!(state, ControllerState::Uninitialized);
    }

    #[test]
    fn test_success_on_fifth_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_with_mtime(&dir, 2000);
        let mut store = store_with(1000);
        let sim = SimulatedDriver::new();
        sim.queue_downloads(&[false, false, false, false, true]);
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        let status = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap();

        assert_eq!(status, FirmwareStatus::Updated { attempts: 5 });
        assert_eq!(sim.download_count(), 5);
        assert_eq!(persisted(&store), 2000);
        assert_eq!(state, ControllerState::Ready);
    }

    #[test]
    fn test_success_stops_retrying() {
        for k in 1..=5u32 {
            let dir = tempfile::tempdir().unwrap();
            let artifact = artifact_with_mtime(&dir, 3000);
            let mut store = store_with(1000);
            let sim = SimulatedDriver::new();
            let mut script = vec![false; (k - 1) as usize];
            script.push(true);
            sim.queue_downloads(&script);
            sim.set_download_default(false);
            let mut driver = sim.clone();
            let mut state = ControllerState::Uninitialized;

            let status =
                check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap();

            assert_eq!(status, FirmwareStatus::Updated { attempts: k });
            assert_eq!(sim.download_count(), k as usize);
            assert_eq!(persisted(&store), 3000);
        }
    }

    #[test]
    fn test_never_downloaded_triggers_download() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_with_mtime(&dir, 1000);
        let mut store = MemoryPreferenceStore::new();
        let sim = SimulatedDriver::new();
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        let status = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap();

        assert_eq!(status, FirmwareStatus::Updated { attempts: 1 });
        assert_eq!(sim.commands(), vec![DriverCommand::DownloadFirmware]);
    }

    #[test]
    fn test_missing_artifact_fails_without_controller() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = FirmwareArtifact::new(dir.path().join("absent.so"));
        let mut store = store_with(1000);
        let sim = SimulatedDriver::new();
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        let err = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap_err();

        assert!(matches!(err, HostError::FirmwareCheck { .. }));
        assert!(sim.commands().is_empty());
        assert_eq!(persisted(&store), 1000);
    }

    #[test]
    fn test_failed_check_is_retried_next_time() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_with_mtime(&dir, 2000);
        let mut store = store_with(1000);
        let sim = SimulatedDriver::new();
        sim.queue_downloads(&[false; 5]);
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        assert!(check_firmware(&mut driver, &mut store, &artifact, &mut state).is_err());
        // Queue is empty now, default outcome is success
        let status = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap();
        assert_eq!(status, FirmwareStatus::Updated { attempts: 1 });
        assert_eq!(sim.download_count(), 6);
        assert_eq!(persisted(&store), 2000);
    }

    #[test]
    fn test_unsaved_record_still_reports_update() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_with_mtime(&dir, 2000);
        let mut store = ReadOnlyStore(1000);
        let sim = SimulatedDriver::new();
        let mut driver = sim.clone();
        let mut state = ControllerState::Uninitialized;

        let status = check_firmware(&mut driver, &mut store, &artifact, &mut state).unwrap();

        assert_eq!(status, FirmwareStatus::Updated { attempts: 1 });
        assert_eq!(sim.download_count(), 1);
        assert_eq!(
            store.get_long(PREF_NAMESPACE, PREF_FIRMWARE_MODTIME, FIRMWARE_MODTIME_DEFAULT),
            1000
        );
        assert_eq!(state, ControllerState::Ready);
    }
}
