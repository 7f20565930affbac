//! End-to-end capture flow against the simulated driver: enumerate, open,
//! configure geometry, expose, poll, fetch, and tear down.

use std::time::{Duration, Instant};

use poa_camera::{
    enumerate, AcquisitionPipeline, CameraState, DeviceSession, Error, ExposureMode,
    ImageFormat, Roi, SimCameraConfig, SimDriver,
};

fn open_first(driver: &SimDriver) -> DeviceSession<SimDriver> {
    let descriptor = enumerate(driver).unwrap().remove(0);
    let mut session = DeviceSession::new(driver.clone(), descriptor);
    session.open().unwrap();
    session.init().unwrap();
    session
}

#[test]
fn binned_roi_single_frame_capture() {
    let driver = SimDriver::with_default_camera();
    let mut session = open_first(&driver);
    assert_eq!(session.descriptor().max_width, 1920);
    assert_eq!(session.descriptor().bins, vec![1, 2]);

    session.set_binning(2).unwrap();
    session.set_roi(Roi::new(0, 0, 910, 520)).unwrap();
    assert_eq!(session.roi(), Roi::new(0, 0, 908, 520));

    session.set_exposure(Duration::from_millis(10), false).unwrap();
    let needed = session.frame_bytes();
    assert_eq!(needed, 908 * 520);

    let mut pipeline = AcquisitionPipeline::new(&mut session);
    pipeline.start(ExposureMode::Single).unwrap();

    let deadline = Instant::now() + pipeline.recommended_timeout().unwrap();
    while !pipeline.poll_ready().unwrap() {
        assert!(Instant::now() < deadline, "frame never became ready");
        std::thread::sleep(Duration::from_millis(1));
    }

    let mut frame = vec![0u8; needed];
    pipeline.fetch_next(&mut frame).unwrap();
    pipeline.stop().unwrap();
    assert_eq!(session.state(), CameraState::Opened);

    session.close().unwrap();
    assert_eq!(session.state(), CameraState::Closed);
}

#[test]
fn format_change_resizes_frames() {
    let driver = SimDriver::with_default_camera();
    let mut session = open_first(&driver);
    session.set_roi(Roi::new(0, 0, 320, 240)).unwrap();
    session.set_exposure(Duration::from_millis(5), false).unwrap();

    session.set_format(ImageFormat::Raw16).unwrap();
    let needed = session.frame_bytes();
    assert_eq!(needed, 320 * 240 * 2);

    // A buffer sized for the old 8-bit format is now too small.
    let mut old_buffer = vec![0u8; 320 * 240];
    let mut pipeline = AcquisitionPipeline::new(&mut session);
    pipeline.start(ExposureMode::Single).unwrap();
    assert_eq!(
        pipeline
            .fetch_frame(&mut old_buffer, Duration::from_millis(200))
            .unwrap_err(),
        Error::SizeTooSmall {
            given: 320 * 240,
            needed,
        }
    );

    let mut frame = vec![0u8; needed];
    pipeline.fetch_next(&mut frame).unwrap();
    pipeline.stop().unwrap();
}

#[test]
fn unplugged_camera_surfaces_invalid_id() {
    let driver = SimDriver::with_default_camera();
    let mut session = open_first(&driver);
    driver.remove_camera(session.descriptor().camera_id);

    assert_eq!(session.set_gain(50, false).unwrap_err(), Error::InvalidId);
    assert_eq!(session.start_exposure(true).unwrap_err(), Error::InvalidId);
}

#[test]
fn two_cameras_are_independent() {
    let driver = SimDriver::new();
    driver.add_camera(SimCameraConfig::default());
    driver.add_camera(SimCameraConfig::color());

    let devices = enumerate(&driver).unwrap();
    assert_eq!(devices.len(), 2);
    assert!(devices[1].is_color());

    let mut mono = DeviceSession::new(driver.clone(), devices[0].clone());
    let mut color = DeviceSession::new(driver.clone(), devices[1].clone());
    mono.open().unwrap();
    color.open().unwrap();

    mono.start_exposure(false).unwrap();
    assert_eq!(mono.state(), CameraState::Exposing);
    assert_eq!(color.state(), CameraState::Opened);

    // The color unit exposes white balance; the mono unit does not.
    assert!(color.config_registry().attributes_of(poa_camera::ConfigId::WbRed).is_ok());
    assert!(mono.config_registry().attributes_of(poa_camera::ConfigId::WbRed).is_err());

    mono.stop_exposure().unwrap();
}
