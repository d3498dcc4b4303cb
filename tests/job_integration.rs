//! In-memory job builder tests.

mod helpers;

use helpers::tolerances::*;
use helpers::*;
use spectra::prelude::*;

#[test]
fn test_empty_job_round_trips() {
    let source = stereo_noise(12_000);
    let output = Job::from_buffer(source.clone()).render().unwrap();
    assert_buffers_close(&output, &source, ROUND_TRIP_EPSILON);
}

#[test]
fn test_job_matches_manual_pipeline() {
    let source = mono_sine();
    let config = PvocConfig::from(FftSize::Small);
    let width: Breakpoints = "0 1\n0.5 12\n# hold\n1 12".parse().unwrap();

    let manual = SpectralBuffer::analyze(&source, &config)
        .unwrap()
        .blur(&width)
        .unwrap()
        .chorus(&Constant(0.2), 77)
        .unwrap()
        .resynthesize()
        .unwrap();

    let job = Job::from_buffer(source)
        .config(config)
        .blur(width)
        .chorus(Constant(0.2), 77)
        .render()
        .unwrap();

    assert_buffers_close(&job, &manual, 0.0);
}

#[test]
fn test_steps_run_in_order() {
    let source = mono_sine();
    let silence = SampleBuffer::from_channels(TEST_SAMPLE_RATE, vec![vec![0.0; 5000]]).unwrap();

    // Crossing with silence first leaves nothing for chorus to move
    let silenced = Job::from_buffer(source.clone())
        .cross_with(silence, Constant(1.0))
        .chorus(Constant(1.0), 4)
        .render()
        .unwrap();
    assert!(rms(silenced.as_slice()) <= FLOAT_EPSILON);

    let detuned = Job::from_buffer(source.clone())
        .chorus(Constant(1.0), 4)
        .render()
        .unwrap();
    assert!(max_difference(detuned.as_slice(), source.as_slice()) > AUDIBLE_CHANGE);
}

#[test]
fn test_invalid_control_surfaces_from_render() {
    let result = Job::from_buffer(mono_sine())
        .blur(|t: f64| if t > 0.5 { f64::NAN } else { 2.0 })
        .render();
    assert!(matches!(
        result,
        Err(spectra::Error::Core(spectra::core::Error::InvalidControl(_)))
    ));
}

#[test]
fn test_empty_input_renders_empty_output() {
    let empty = SampleBuffer::new(Format::new(TEST_SAMPLE_RATE, 2, 0).unwrap());
    let output = Job::from_buffer(empty)
        .blur(Constant(8.0))
        .chorus(Constant(1.0), 0)
        .render()
        .unwrap();
    assert_eq!(output.num_channels(), 2);
    assert!(output.is_empty());
}
