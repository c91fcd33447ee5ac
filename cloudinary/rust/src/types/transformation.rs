//! Transformation parameters and their URL component encoding.

use super::common::TransformValue;
use serde::{Deserialize, Serialize};

/// Image and video transformation parameters.
///
/// Every parameter has a long form (`width`) and most have the shorthand
/// the URL uses (`w`). When both are set the long form is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformationOptions {
    /// Target width in pixels or relative (`0.5`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<TransformValue>,
    /// Target height in pixels or relative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<TransformValue>,
    /// Crop mode (`fill`, `thumb`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    /// Focus area for cropping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
    /// Compression quality (`80`, `auto`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<TransformValue>,
    /// Delivery format conversion (`f_auto`), not the file extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_format: Option<String>,
    /// Corner radius (`20`, `max`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<TransformValue>,
    /// Rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<TransformValue>,
    /// Effect with optional argument (`sepia`, `blur:300`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// Opacity percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<TransformValue>,
    /// Border (`4px_solid_black`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Overlay layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    /// Underlay layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlay: Option<String>,
    /// Flags, dot separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    /// Device pixel ratio. Whole numbers render with a `.0` suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpr: Option<TransformValue>,
    /// Zoom factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<TransformValue>,
    /// Horizontal offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<TransformValue>,
    /// Vertical offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<TransformValue>,
    /// Aspect ratio (`16:9`, `1.5`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<TransformValue>,
    /// Color for effects and text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Color space.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    /// Animated image frame delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<TransformValue>,
    /// Density for vector rasterization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<TransformValue>,
    /// Page or layer of a multi-page asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<TransformValue>,
    /// Video start offset when `start_offset` is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<TransformValue>,
    /// Video duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<TransformValue>,
    /// Video start offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<TransformValue>,
    /// Video end offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<TransformValue>,
    /// Video codec.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    /// Audio codec.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Video bit rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<TransformValue>,
    /// Audio bit rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bit_rate: Option<TransformValue>,
    /// Frame rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<TransformValue>,
    /// Keyframe interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyframe_interval: Option<TransformValue>,
    /// Adaptive streaming profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_profile: Option<String>,
    /// Frames sampled for animated output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_sampling: Option<TransformValue>,
    /// Named transformation (`t_`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named: Option<String>,
    /// Appended verbatim after the generated parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_transformation: Option<String>,

    /// Shorthand for `width`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<TransformValue>,
    /// Shorthand for `height`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<TransformValue>,
    /// Shorthand for `crop`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    /// Shorthand for `gravity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g: Option<String>,
    /// Shorthand for `quality`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<TransformValue>,
    /// Shorthand for `fetch_format`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<String>,
    /// Shorthand for `radius`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<TransformValue>,
    /// Shorthand for `angle`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<TransformValue>,
    /// Shorthand for `effect`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Shorthand for `opacity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o: Option<TransformValue>,
    /// Shorthand for `border`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bo: Option<String>,
    /// Shorthand for `background`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    /// Shorthand for `overlay`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<String>,
    /// Shorthand for `underlay`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
    /// Shorthand for `zoom`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<TransformValue>,
    /// Shorthand for `aspect_ratio`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ar: Option<TransformValue>,
    /// Shorthand for `color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co: Option<String>,
    /// Shorthand for `density`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dn: Option<TransformValue>,
    /// Shorthand for `page`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg: Option<TransformValue>,
    /// Shorthand for `offset`.
    #[serde(rename = "of", skip_serializing_if = "Option::is_none")]
    pub of: Option<TransformValue>,
    /// Shorthand for `duration`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub du: Option<TransformValue>,
    /// Shorthand for `start_offset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so: Option<TransformValue>,
    /// Shorthand for `end_offset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eo: Option<TransformValue>,
    /// Shorthand for `video_codec`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vc: Option<String>,
    /// Shorthand for `audio_codec`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ac: Option<String>,
    /// Shorthand for `bit_rate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub br: Option<TransformValue>,
    /// Shorthand for `audio_bit_rate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ab: Option<TransformValue>,
    /// Shorthand for `keyframe_interval`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ki: Option<TransformValue>,
    /// Shorthand for `streaming_profile`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp: Option<String>,
}

fn pick<T: ToString>(long: &Option<T>, short: &Option<T>) -> Option<String> {
    long.as_ref().or(short.as_ref()).map(ToString::to_string)
}

fn one<T: ToString>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(ToString::to_string)
}

/// Whole numbers keep a `.0` suffix (`dpr_2.0`).
fn decimal(value: &Option<TransformValue>) -> Option<String> {
    value.as_ref().map(|v| match v {
        TransformValue::Int(n) => format!("{}.0", n),
        TransformValue::Float(f) if f.fract() == 0.0 => format!("{:.1}", f),
        other => other.to_string(),
    })
}

impl TransformationOptions {
    /// Create empty transformation options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `width`.
    pub fn width(mut self, value: impl Into<TransformValue>) -> Self {
        self.width = Some(value.into());
        self
    }

    /// Set `height`.
    pub fn height(mut self, value: impl Into<TransformValue>) -> Self {
        self.height = Some(value.into());
        self
    }

    /// Set `crop`.
    pub fn crop(mut self, value: impl Into<String>) -> Self {
        self.crop = Some(value.into());
        self
    }

    /// Set `gravity`.
    pub fn gravity(mut self, value: impl Into<String>) -> Self {
        self.gravity = Some(value.into());
        self
    }

    /// Set `quality`.
    pub fn quality(mut self, value: impl Into<TransformValue>) -> Self {
        self.quality = Some(value.into());
        self
    }

    /// Set `fetch_format`.
    pub fn fetch_format(mut self, value: impl Into<String>) -> Self {
        self.fetch_format = Some(value.into());
        self
    }

    /// Set `radius`.
    pub fn radius(mut self, value: impl Into<TransformValue>) -> Self {
        self.radius = Some(value.into());
        self
    }

    /// Set `angle`.
    pub fn angle(mut self, value: impl Into<TransformValue>) -> Self {
        self.angle = Some(value.into());
        self
    }

    /// Set `effect`.
    pub fn effect(mut self, value: impl Into<String>) -> Self {
        self.effect = Some(value.into());
        self
    }

    /// Set `overlay`.
    pub fn overlay(mut self, value: impl Into<String>) -> Self {
        self.overlay = Some(value.into());
        self
    }

    /// Set `flags`.
    pub fn flags(mut self, value: impl Into<String>) -> Self {
        self.flags = Some(value.into());
        self
    }

    /// Set `dpr`.
    pub fn dpr(mut self, value: impl Into<TransformValue>) -> Self {
        self.dpr = Some(value.into());
        self
    }

    /// Set `aspect_ratio`.
    pub fn aspect_ratio(mut self, value: impl Into<TransformValue>) -> Self {
        self.aspect_ratio = Some(value.into());
        self
    }

    /// Set `start_offset`.
    pub fn start_offset(mut self, value: impl Into<TransformValue>) -> Self {
        self.start_offset = Some(value.into());
        self
    }

    /// Set `end_offset`.
    pub fn end_offset(mut self, value: impl Into<TransformValue>) -> Self {
        self.end_offset = Some(value.into());
        self
    }

    /// Set `video_codec`.
    pub fn video_codec(mut self, value: impl Into<String>) -> Self {
        self.video_codec = Some(value.into());
        self
    }

    /// Set `named`.
    pub fn named(mut self, value: impl Into<String>) -> Self {
        self.named = Some(value.into());
        self
    }

    /// Set `raw_transformation`.
    pub fn raw_transformation(mut self, value: impl Into<String>) -> Self {
        self.raw_transformation = Some(value.into());
        self
    }

    /// Effective `(url_key, value)` pairs, long form winning over shorthand.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let start_offset =
            pick(&self.start_offset, &self.so).or_else(|| pick(&self.offset, &self.of));

        let candidates = [
            ("w", pick(&self.width, &self.w)),
            ("h", pick(&self.height, &self.h)),
            ("c", pick(&self.crop, &self.c)),
            ("g", pick(&self.gravity, &self.g)),
            ("q", pick(&self.quality, &self.q)),
            ("f", pick(&self.fetch_format, &self.f)),
            ("r", pick(&self.radius, &self.r)),
            ("a", pick(&self.angle, &self.a)),
            ("e", pick(&self.effect, &self.e)),
            ("o", pick(&self.opacity, &self.o)),
            ("bo", pick(&self.border, &self.bo)),
            ("b", pick(&self.background, &self.b)),
            ("l", pick(&self.overlay, &self.l)),
            ("u", pick(&self.underlay, &self.u)),
            ("fl", one(&self.flags)),
            ("dpr", decimal(&self.dpr)),
            ("z", pick(&self.zoom, &self.z)),
            ("x", one(&self.x)),
            ("y", one(&self.y)),
            ("ar", pick(&self.aspect_ratio, &self.ar)),
            ("co", pick(&self.color, &self.co)),
            ("cs", one(&self.color_space)),
            ("dl", one(&self.delay)),
            ("dn", pick(&self.density, &self.dn)),
            ("pg", pick(&self.page, &self.pg)),
            ("du", pick(&self.duration, &self.du)),
            ("so", start_offset),
            ("eo", pick(&self.end_offset, &self.eo)),
            ("vc", pick(&self.video_codec, &self.vc)),
            ("ac", pick(&self.audio_codec, &self.ac)),
            ("br", pick(&self.bit_rate, &self.br)),
            ("ab", pick(&self.audio_bit_rate, &self.ab)),
            ("fps", one(&self.fps)),
            ("ki", pick(&self.keyframe_interval, &self.ki)),
            ("sp", pick(&self.streaming_profile, &self.sp)),
            ("vs", one(&self.video_sampling)),
            ("t", one(&self.named)),
        ];

        candidates
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect()
    }

    /// URL component: `key_value` parts sorted and comma joined.
    ///
    /// Returns an empty string when nothing is set.
    pub fn to_transformation_string(&self) -> String {
        let mut parts: Vec<String> = self
            .to_params()
            .into_iter()
            .map(|(key, value)| format!("{}_{}", key, value))
            .collect();
        parts.sort();

        if let Some(raw) = self.raw_transformation.as_deref().filter(|r| !r.is_empty()) {
            parts.push(raw.to_string());
        }

        parts.join(",")
    }

    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.to_transformation_string().is_empty()
    }
}

/// Render a list of transformations as one `a|b|c` value (eager uploads).
pub fn join_transformations(transformations: &[TransformationOptions]) -> String {
    transformations
        .iter()
        .map(TransformationOptions::to_transformation_string)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}
