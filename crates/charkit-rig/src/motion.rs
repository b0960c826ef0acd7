//! Motion-curve CSV import.
//!
//! Facial capture exports arrive as fixed-column CSV: an `HH:MM:SS:FF`
//! timecode, an integer frame counter, then one float column per capture
//! channel. The importer parses the clip, optionally smooths it with a
//! single-pole low-pass filter and adds seeded amplitude variance, and
//! resamples everything onto integer frames by linear interpolation.
//! Channels on the exclusion list are resampled but never reshaped.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// One capture channel, values aligned to [`MotionClip::times`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionChannel {
    /// Channel name from the CSV header.
    pub name: String,
    /// One value per sample.
    pub values: Vec<f64>,
}

/// A parsed (or processed) motion clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionClip {
    /// Detected frame rate, 30 or 60.
    pub fps: u32,
    /// Sample times in seconds, ascending.
    pub times: Vec<f64>,
    /// All channels, in header order.
    pub channels: Vec<MotionChannel>,
}

impl MotionClip {
    /// Looks up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&MotionChannel> {
        self.channels.iter().find(|c| c.name == name)
    }
}

/// Import processing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// Low-pass filter factor in [0, 1]; 0 leaves samples untouched and
    /// 1 holds the first sample forever.
    pub filter: f64,
    /// Uniform amplitude variance fraction; 0 disables.
    pub variance: f64,
    /// Seed for the variance stream; the same seed reproduces the same
    /// jitter exactly.
    pub seed: u64,
    /// Channel names (case-insensitive) passed through raw.
    pub exclude: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            filter: 0.0,
            variance: 0.0,
            seed: 0,
            exclude: Vec::new(),
        }
    }
}

/// Loads and parses a motion CSV file.
pub fn load_csv(path: &Path) -> Result<MotionClip, MotionError> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text)
}

/// Parses motion CSV text.
pub fn parse_csv(text: &str) -> Result<MotionClip, MotionError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (_, header) = lines.next().ok_or(MotionError::MissingHeader)?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns.len() < 2
        || !columns[0].eq_ignore_ascii_case("timecode")
        || !columns[1].eq_ignore_ascii_case("frame")
    {
        return Err(MotionError::MissingHeader);
    }
    let names: Vec<String> = columns[2..].iter().map(|c| c.to_string()).collect();

    // Rows are collected raw first: the subframe field decides the frame
    // rate, and times can only be computed once it is known.
    struct Row {
        seconds: u32,
        subframe: u32,
        values: Vec<f64>,
    }
    let mut rows: Vec<Row> = Vec::new();
    for (line, text) in lines {
        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        if fields.len() != columns.len() {
            return Err(MotionError::ColumnMismatch {
                line,
                expected: columns.len(),
                found: fields.len(),
            });
        }
        let (seconds, subframe) = parse_timecode(line, fields[0])?;
        fields[1].parse::<u32>().map_err(|_| MotionError::BadValue {
            line,
            value: fields[1].to_string(),
        })?;
        let values = fields[2..]
            .iter()
            .map(|f| {
                f.parse::<f64>().map_err(|_| MotionError::BadValue {
                    line,
                    value: f.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, MotionError>>()?;
        rows.push(Row {
            seconds,
            subframe,
            values,
        });
    }

    // A subframe index of 30 or above can only come from a 60 fps export.
    let fps: u32 = if rows.iter().any(|r| r.subframe >= 30) {
        60
    } else {
        30
    };

    let times: Vec<f64> = rows
        .iter()
        .map(|r| f64::from(r.seconds) + f64::from(r.subframe) / f64::from(fps))
        .collect();
    let channels = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| MotionChannel {
            name,
            values: rows.iter().map(|r| r.values[i]).collect(),
        })
        .collect();

    Ok(MotionClip {
        fps,
        times,
        channels,
    })
}

/// Parses `HH:MM:SS:FF` into total seconds plus the subframe index.
fn parse_timecode(line: usize, field: &str) -> Result<(u32, u32), MotionError> {
    let bad = || MotionError::BadTimecode {
        line,
        value: field.to_string(),
    };
    let parts: Vec<&str> = field.split(':').collect();
    if parts.len() != 4 {
        return Err(bad());
    }
    let mut nums = [0u32; 4];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| bad())?;
    }
    let [h, m, s, ff] = nums;
    Ok((h * 3600 + m * 60 + s, ff))
}

/// Applies filtering, variance and frame resampling to a parsed clip.
pub fn process(clip: &MotionClip, options: &ImportOptions) -> MotionClip {
    let fps = f64::from(clip.fps);
    let duration = clip.times.last().copied().unwrap_or(0.0);
    let frame_count = (duration * fps).round() as usize;
    let frame_times: Vec<f64> = (0..=frame_count).map(|f| f as f64 / fps).collect();

    let mut rng = Pcg32::seed_from_u64(options.seed);
    let channels = clip
        .channels
        .iter()
        .map(|channel| {
            let excluded = options
                .exclude
                .iter()
                .any(|e| e.eq_ignore_ascii_case(&channel.name));
            let mut values = channel.values.clone();
            if !excluded {
                low_pass(&mut values, options.filter);
                if options.variance > 0.0 {
                    for v in &mut values {
                        let jitter = rng.gen_range(-options.variance..=options.variance);
                        *v *= 1.0 + jitter;
                    }
                }
            }
            MotionChannel {
                name: channel.name.clone(),
                values: resample(&clip.times, &values, &frame_times),
            }
        })
        .collect();

    MotionClip {
        fps: clip.fps,
        times: frame_times,
        channels,
    }
}

/// Single-pole low-pass: `v' = v_prev * f + v * (1 - f)`, in place.
pub fn low_pass(values: &mut [f64], filter: f64) {
    let f = filter.clamp(0.0, 1.0);
    if f <= 0.0 {
        return;
    }
    for i in 1..values.len() {
        values[i] = values[i - 1] * f + values[i] * (1.0 - f);
    }
}

/// Linear resampling of (times, values) onto the target times; targets
/// outside the source span clamp to the end values.
fn resample(times: &[f64], values: &[f64], targets: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![0.0; targets.len()];
    }
    let mut out = Vec::with_capacity(targets.len());
    for &t in targets {
        let i = times.partition_point(|&s| s < t);
        let v = if i == 0 {
            values[0]
        } else if i >= times.len() {
            values[values.len() - 1]
        } else {
            let (t0, t1) = (times[i - 1], times[i]);
            let span = t1 - t0;
            if span <= f64::EPSILON {
                values[i]
            } else {
                let a = (t - t0) / span;
                values[i - 1] * (1.0 - a) + values[i] * a
            }
        };
        out.push(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV_30: &str = "\
Timecode,Frame,Brow_Raise_L,Jaw_Open
00:00:00:00,0,0.0,1.0
00:00:00:01,1,1.0,1.0
00:00:00:02,2,0.5,1.0
";

    #[test]
    fn parses_header_and_rows() {
        let clip = parse_csv(CSV_30).unwrap();
        assert_eq!(clip.fps, 30);
        assert_eq!(clip.channels.len(), 2);
        assert_eq!(clip.channel("Brow_Raise_L").unwrap().values, vec![0.0, 1.0, 0.5]);
        assert!((clip.times[1] - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn high_subframes_mean_sixty_fps() {
        let csv = "\
Timecode,Frame,A
00:00:00:00,0,0.0
00:00:00:45,45,1.0
";
        let clip = parse_csv(csv).unwrap();
        assert_eq!(clip.fps, 60);
        assert!((clip.times[1] - 45.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn bad_timecode_names_the_line() {
        let csv = "Timecode,Frame,A\n00:00:00,0,0.5\n";
        match parse_csv(csv).unwrap_err() {
            MotionError::BadTimecode { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "00:00:00");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn column_mismatch_is_an_error() {
        let csv = "Timecode,Frame,A,B\n00:00:00:00,0,0.5\n";
        assert!(matches!(
            parse_csv(csv).unwrap_err(),
            MotionError::ColumnMismatch {
                line: 2,
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn missing_header_is_an_error() {
        assert!(matches!(parse_csv(""), Err(MotionError::MissingHeader)));
        assert!(matches!(
            parse_csv("A,B,C\n"),
            Err(MotionError::MissingHeader)
        ));
    }

    #[test]
    fn zero_filter_is_identity() {
        let clip = parse_csv(CSV_30).unwrap();
        let out = process(&clip, &ImportOptions::default());
        assert_eq!(
            out.channel("Brow_Raise_L").unwrap().values,
            vec![0.0, 1.0, 0.5]
        );
    }

    #[test]
    fn full_filter_holds_the_first_sample() {
        let clip = parse_csv(CSV_30).unwrap();
        let out = process(
            &clip,
            &ImportOptions {
                filter: 1.0,
                ..ImportOptions::default()
            },
        );
        assert_eq!(out.channel("Brow_Raise_L").unwrap().values, vec![0.0; 3]);
    }

    #[test]
    fn variance_is_seeded_and_reproducible() {
        let clip = parse_csv(CSV_30).unwrap();
        let options = ImportOptions {
            variance: 0.2,
            seed: 42,
            ..ImportOptions::default()
        };
        let a = process(&clip, &options);
        let b = process(&clip, &options);
        assert_eq!(a, b);

        let c = process(
            &clip,
            &ImportOptions {
                seed: 43,
                ..options
            },
        );
        assert_ne!(a, c);
    }

    #[test]
    fn excluded_channels_stay_raw() {
        let clip = parse_csv(CSV_30).unwrap();
        let out = process(
            &clip,
            &ImportOptions {
                filter: 0.5,
                exclude: vec!["brow_raise_l".to_string()],
                ..ImportOptions::default()
            },
        );
        // The excluded channel keeps its raw samples; Jaw_Open is constant
        // so filtering cannot change it either way.
        assert_eq!(
            out.channel("Brow_Raise_L").unwrap().values,
            vec![0.0, 1.0, 0.5]
        );
        assert_eq!(out.channel("Jaw_Open").unwrap().values, vec![1.0; 3]);
    }

    #[test]
    fn resampling_interpolates_missing_frames() {
        let csv = "\
Timecode,Frame,A
00:00:00:00,0,0.0
00:00:00:02,2,1.0
";
        let clip = parse_csv(csv).unwrap();
        let out = process(&clip, &ImportOptions::default());
        assert_eq!(out.channel("A").unwrap().values.len(), 3);
        assert!((out.channel("A").unwrap().values[1] - 0.5).abs() < 1e-9);
    }
}
