//! End-to-end correction properties.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p earshape-dsp --test correction
//! ```

use std::f64::consts::PI;

use earshape_dsp::{
    correct_stereo, AttenuationCurve, CorrectionApplicator, CorrectionConfig, SpectralAnalyzer,
    StereoPcm, DEFAULT_GAIN_BOOST,
};
use earshape_spec::{Audiogram, AudiogramPoint, Ear};

fn unity() -> CorrectionConfig {
    CorrectionConfig { gain_boost: 1.0 }
}

fn symmetric(points: &[(f64, f64)]) -> Audiogram {
    let points: Vec<AudiogramPoint> = points.iter().copied().map(AudiogramPoint::from).collect();
    Audiogram::new(points.clone(), points).unwrap()
}

fn sine(frequency: f64, amplitude: f64, rate: u32, n: usize) -> Vec<i16> {
    (0..n)
        .map(|i| {
            let t = i as f64 / rate as f64;
            (amplitude * (2.0 * PI * frequency * t).sin()).round() as i16
        })
        .collect()
}

fn noise(n: usize, seed: u32) -> Vec<i16> {
    // Small LCG so the fixture is reproducible without extra crates
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((state >> 16) as i16) / 4
        })
        .collect()
}

#[test]
fn zero_loss_with_unity_boost_round_trips() {
    let audiogram = symmetric(&[(100.0, 0.0), (1000.0, 0.0), (8000.0, 0.0)]);
    let audio = StereoPcm::new(22050, noise(2048, 7), noise(2048, 11)).unwrap();

    let output = correct_stereo(&audio, &audiogram, unity()).unwrap();

    assert_eq!(output.pcm.samples, audio.interleaved());
    assert_eq!(output.pcm.saturated, 0);
}

#[test]
fn odd_length_round_trips() {
    let audiogram = symmetric(&[(300.0, 0.0), (3000.0, 0.0)]);
    let audio = StereoPcm::new(8000, noise(1001, 3), noise(1001, 5)).unwrap();

    let output = correct_stereo(&audio, &audiogram, unity()).unwrap();

    assert_eq!(output.pcm.samples, audio.interleaved());
}

#[test]
fn ten_db_loss_scales_bin_by_a_tenth() {
    let rate = 44100;
    let tone = sine(1000.0, 10000.0, rate, 44100);
    let points = [
        AudiogramPoint::new(100.0, 0.0),
        AudiogramPoint::new(1000.0, 10.0),
        AudiogramPoint::new(5000.0, 20.0),
    ];
    let curve = AttenuationCurve::build(Ear::Left, &points, rate).unwrap();

    let mut analyzer = SpectralAnalyzer::new();
    let spectrum = analyzer.analyze_pcm(&tone, rate).unwrap();
    let corrected = CorrectionApplicator::default().apply(&spectrum, &curve);

    // 1 Hz resolution puts 1000 Hz on bin 1000
    assert_eq!(spectrum.axis().frequency(1000), 1000.0);
    let ratio = corrected.bins()[1000].norm() / spectrum.bins()[1000].norm();
    assert!((ratio - 0.1 * DEFAULT_GAIN_BOOST).abs() < 1e-9, "ratio was {}", ratio);
}

#[test]
fn ten_db_loss_survives_resynthesis() {
    // Points on one line give a curve without overshoot, unlike the
    // flat-padded audiogram above which swings far below 0 dB up high
    let rate = 44100;
    let n = 44100;
    let tone = sine(1000.0, 10000.0, rate, n);
    let audio = StereoPcm::new(rate, tone.clone(), tone).unwrap();
    let audiogram = symmetric(&[(0.0, 0.0), (1000.0, 10.0), (2000.0, 20.0), (44100.0, 441.0)]);

    let output = correct_stereo(&audio, &audiogram, unity()).unwrap();

    let mut analyzer = SpectralAnalyzer::new();
    let input = analyzer.analyze_pcm(audio.channel(Ear::Left), rate).unwrap();
    let corrected = analyzer.analyze(output.channel(Ear::Left), rate).unwrap();

    let ratio = corrected.bins()[1000].norm() / input.bins()[1000].norm();
    assert!((ratio - 0.1).abs() < 1e-6, "ratio was {}", ratio);
    assert_eq!(output.pcm.saturated, 0);
}

#[test]
fn default_boost_carries_into_output() {
    let rate = 8000;
    let audio = StereoPcm::new(rate, sine(500.0, 100.0, rate, 800), vec![0; 800]).unwrap();
    let audiogram = symmetric(&[(200.0, 0.0), (2000.0, 0.0)]);

    let output = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();

    for (out, inp) in output.left.iter().zip(audio.channel(Ear::Left)) {
        assert!((out - *inp as f64 * 100.0).abs() < 1e-6);
    }
}

#[test]
fn silence_in_silence_out() {
    let audiogram = symmetric(&[(100.0, 0.0), (1000.0, 10.0), (5000.0, 20.0)]);
    let audio = StereoPcm::new(16000, vec![0; 1600], vec![0; 1600]).unwrap();

    let output = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();

    assert!(output.pcm.samples.iter().all(|&s| s == 0));
}

#[test]
fn output_is_bit_identical_across_runs() {
    let audiogram = symmetric(&[(125.0, 5.0), (1000.0, 15.0), (4000.0, 30.0)]);
    let audio = StereoPcm::new(16000, noise(4000, 1), noise(4000, 2)).unwrap();

    let first = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();
    let second = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();

    assert_eq!(first.pcm, second.pcm);
    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first.left), bits(&second.left));
    assert_eq!(bits(&first.right), bits(&second.right));
}

#[test]
fn output_length_matches_input_length() {
    let audiogram = symmetric(&[(100.0, 3.0), (1000.0, 9.0)]);
    for n in 8..48 {
        let audio = StereoPcm::new(8000, noise(n, n as u32), noise(n, 99)).unwrap();
        let output = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();
        assert_eq!(output.left.len(), n);
        assert_eq!(output.right.len(), n);
        assert_eq!(output.pcm.samples.len(), 2 * n);
    }
}

#[test]
fn curve_spans_zero_to_sample_rate() {
    let points = [
        AudiogramPoint::new(250.0, 10.0),
        AudiogramPoint::new(1000.0, 20.0),
        AudiogramPoint::new(4000.0, 40.0),
    ];
    let curve = AttenuationCurve::build(Ear::Right, &points, 16000).unwrap();

    assert!((curve.loss_db(0.0) - 10.0).abs() < 1e-9);
    assert!((curve.loss_db(16000.0) - 40.0).abs() < 1e-9);
    for point in &points {
        assert!((curve.loss_db(point.frequency_hz) - point.loss_db).abs() < 1e-9);
    }
    assert!((0..=160).all(|i| curve.loss_db(i as f64 * 100.0).is_finite()));
}

#[test]
fn ears_are_corrected_independently() {
    let rate = 8000;
    let tone = sine(1000.0, 1000.0, rate, 800);
    let audio = StereoPcm::new(rate, tone.clone(), tone).unwrap();
    let left = [AudiogramPoint::new(500.0, 0.0), AudiogramPoint::new(2000.0, 0.0)];
    let right = [AudiogramPoint::new(500.0, 20.0), AudiogramPoint::new(2000.0, 20.0)];
    let audiogram = Audiogram::new(left, right).unwrap();

    let output = correct_stereo(&audio, &audiogram, unity()).unwrap();

    let peak = |v: &[f64]| v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    let ratio = peak(output.channel(Ear::Right)) / peak(output.channel(Ear::Left));
    assert!((ratio - 0.01).abs() < 1e-6, "ratio was {}", ratio);
}
