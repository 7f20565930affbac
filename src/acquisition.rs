//! The image acquisition pipeline: exposure runs, readiness polling,
//! timed frame retrieval, and dropped-frame accounting.

use std::time::Duration;

use crate::driver::CameraDriver;
use crate::session::DeviceSession;
use crate::types::CameraState;
use crate::{Error, Result};

/// Margin added on top of the exposure time when computing a fetch
/// timeout, absorbing driver and USB scheduling jitter.
pub const FETCH_MARGIN: Duration = Duration::from_millis(500);

/// Exposure run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureMode {
    /// Snap mode: expose exactly one frame, then the camera idles.
    /// An explicit [`AcquisitionPipeline::stop`] is still required.
    Single,
    /// Video mode: free-running exposure until stopped.
    Continuous,
}

/// Drives frame acquisition over an open [`DeviceSession`].
///
/// The protocol is synchronous and single-threaded: [`poll_ready`] never
/// blocks, [`fetch_frame`] blocks up to its timeout, and there is no
/// cancellation primitive beyond stopping the exposure. The pipeline adds
/// no retry policy; a caller in continuous mode typically counts a failed
/// fetch and proceeds to the next poll cycle.
///
/// [`poll_ready`]: AcquisitionPipeline::poll_ready
/// [`fetch_frame`]: AcquisitionPipeline::fetch_frame
pub struct AcquisitionPipeline<'a, D: CameraDriver> {
    session: &'a mut DeviceSession<D>,
}

impl<'a, D: CameraDriver> AcquisitionPipeline<'a, D> {
    pub fn new(session: &'a mut DeviceSession<D>) -> Self {
        Self { session }
    }

    /// Begin an exposure run in the given mode.
    pub fn start(&mut self, mode: ExposureMode) -> Result<()> {
        self.session.start_exposure(mode == ExposureMode::Single)
    }

    /// Stop the exposure run. No-op when already idle.
    pub fn stop(&mut self) -> Result<()> {
        self.session.stop_exposure()
    }

    /// Non-blocking check whether a complete frame is buffered. Pure
    /// query; polling cadence is entirely the caller's choice.
    pub fn poll_ready(&self) -> Result<bool> {
        self.ensure_open()?;
        self.session.driver().image_ready(self.session.camera_id())
    }

    /// Fetch the next frame into `buffer`, blocking up to `timeout`.
    ///
    /// `buffer` must hold at least [`DeviceSession::frame_bytes`] bytes,
    /// else `SizeTooSmall` without any partial write. Callers in
    /// continuous mode must re-size their buffer whenever ROI, format, or
    /// binning changes.
    pub fn fetch_frame(&mut self, buffer: &mut [u8], timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        let needed = self.session.frame_bytes();
        if buffer.len() < needed {
            return Err(Error::SizeTooSmall {
                given: buffer.len(),
                needed,
            });
        }
        self.session
            .driver()
            .image_data(self.session.camera_id(), &mut buffer[..needed], timeout)
    }

    /// Fetch the next frame using the recommended timeout.
    pub fn fetch_next(&mut self, buffer: &mut [u8]) -> Result<()> {
        let timeout = self.recommended_timeout()?;
        self.fetch_frame(buffer, timeout)
    }

    /// Frames the driver discarded because this consumer fetched too
    /// slowly relative to the frame rate. Non-decreasing within a run; a
    /// rising value means the polling loop is falling behind.
    pub fn dropped_frame_count(&self) -> Result<u32> {
        self.ensure_open()?;
        self.session.driver().dropped_frames(self.session.camera_id())
    }

    /// Current exposure time plus [`FETCH_MARGIN`].
    pub fn recommended_timeout(&self) -> Result<Duration> {
        let (exposure, _) = self.session.exposure()?;
        Ok(exposure + FETCH_MARGIN)
    }

    /// Capture a single frame: start in snap mode, fetch with the
    /// recommended timeout, and stop regardless of the fetch outcome.
    pub fn snap(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.start(ExposureMode::Single)?;
        let fetched = self.fetch_next(buffer);
        let stopped = self.stop();
        fetched.and(stopped)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.session.state() == CameraState::Closed {
            return Err(Error::NotOpened);
        }
        Ok(())
    }
}
