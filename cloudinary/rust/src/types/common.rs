//! Common enums and value types for Cloudinary.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! api_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $s)]
                $variant,
            )+
        }

        impl $name {
            /// Returns the API string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $s,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)+
                    _ => Err(format!("Unknown {}: {}", stringify!($name), s)),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

api_str_enum! {
    /// Kind of stored asset.
    ResourceType {
        /// Images (default).
        Image => "image",
        /// Video.
        Video => "video",
        /// Audio.
        Audio => "audio",
        /// Any non-media file.
        Raw => "raw",
        /// Let the API detect the type on upload.
        Auto => "auto",
    }
}

impl Default for ResourceType {
    fn default() -> Self {
        ResourceType::Image
    }
}

api_str_enum! {
    /// Who may access an asset.
    AccessMode {
        /// Anyone with the URL.
        Public => "public",
        /// Signed or token-authenticated delivery only.
        Authenticated => "authenticated",
        /// No public delivery.
        Private => "private",
    }
}

api_str_enum! {
    /// Delivery type, the `type` path segment of a URL.
    DeliveryType {
        /// Regular uploaded asset.
        Upload => "upload",
        /// Private asset.
        Private => "private",
        /// Authenticated asset.
        Authenticated => "authenticated",
        /// Remote image fetched on first delivery.
        Fetch => "fetch",
    }
}

impl Default for DeliveryType {
    fn default() -> Self {
        DeliveryType::Upload
    }
}

api_str_enum! {
    /// Crop modes.
    Crop {
        /// Scale to the exact dimensions.
        Scale => "scale",
        /// Fit within the dimensions.
        Fit => "fit",
        /// Fit, never upscale.
        Limit => "limit",
        /// Fit, never downscale.
        Mfit => "mfit",
        /// Fill the dimensions, cropping excess.
        Fill => "fill",
        /// Fill, never upscale.
        Lfill => "lfill",
        /// Pad to the dimensions.
        Pad => "pad",
        /// Pad, never upscale.
        Lpad => "lpad",
        /// Pad, never downscale.
        Mpad => "mpad",
        /// Extract a region.
        Crop => "crop",
        /// Thumbnail around the gravity focus.
        Thumb => "thumb",
        /// Imagga smart crop.
        ImaggaCrop => "imagga_crop",
        /// Imagga smart scale.
        ImaggaScale => "imagga_scale",
    }
}

api_str_enum! {
    /// Gravity (focus) for crops and overlays.
    Gravity {
        /// Top-left.
        NorthWest => "north_west",
        /// Top.
        North => "north",
        /// Top-right.
        NorthEast => "north_east",
        /// Left.
        West => "west",
        /// Center.
        Center => "center",
        /// Right.
        East => "east",
        /// Bottom-left.
        SouthWest => "south_west",
        /// Bottom.
        South => "south",
        /// Bottom-right.
        SouthEast => "south_east",
        /// Center of the x/y coordinates.
        XyCenter => "xy_center",
        /// Largest face.
        Face => "face",
        /// All faces.
        Faces => "faces",
        /// Body.
        Body => "body",
        /// Advanced face detection.
        AdvFace => "adv_face",
        /// Advanced detection of all faces.
        AdvFaces => "adv_faces",
        /// Eyes.
        AdvEyes => "adv_eyes",
        /// Ears.
        AdvEar => "adv_ear",
        /// Nose.
        AdvNose => "adv_nose",
        /// Mouth.
        AdvMouth => "adv_mouth",
        /// Legs.
        AdvLegs => "adv_legs",
        /// Arms.
        AdvArms => "adv_arms",
        /// Automatic.
        Auto => "auto",
        /// Automatic, preferring faces.
        AutoAdvFace => "auto:adv_face",
        /// Automatic, preferring all faces.
        AutoAdvFaces => "auto:adv_faces",
        /// Automatic, preferring eyes.
        AutoAdvEyes => "auto:adv_eyes",
        /// Automatic, preferring ears.
        AutoAdvEar => "auto:adv_ear",
        /// Automatic, preferring the nose.
        AutoAdvNose => "auto:adv_nose",
        /// Automatic, preferring the mouth.
        AutoAdvMouth => "auto:adv_mouth",
        /// Automatic, preferring legs.
        AutoAdvLegs => "auto:adv_legs",
        /// Automatic, preferring arms.
        AutoAdvArms => "auto:adv_arms",
    }
}

api_str_enum! {
    /// Listing sort direction.
    Direction {
        /// Oldest first.
        Asc => "asc",
        /// Newest first.
        Desc => "desc",
    }
}

/// A transformation value that may be a number or a string (`150`, `0.5`, `"auto"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformValue {
    /// Integer value.
    Int(i64),
    /// Fractional value.
    Float(f64),
    /// Textual value (`auto`, `iw_div_2`, `16:9`).
    Text(String),
}

impl fmt::Display for TransformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformValue::Int(v) => write!(f, "{}", v),
            TransformValue::Float(v) => write!(f, "{}", v),
            TransformValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i32> for TransformValue {
    fn from(v: i32) -> Self {
        TransformValue::Int(v.into())
    }
}

impl From<i64> for TransformValue {
    fn from(v: i64) -> Self {
        TransformValue::Int(v)
    }
}

impl From<u32> for TransformValue {
    fn from(v: u32) -> Self {
        TransformValue::Int(v.into())
    }
}

impl From<f64> for TransformValue {
    fn from(v: f64) -> Self {
        TransformValue::Float(v)
    }
}

impl From<&str> for TransformValue {
    fn from(v: &str) -> Self {
        TransformValue::Text(v.to_string())
    }
}

impl From<String> for TransformValue {
    fn from(v: String) -> Self {
        TransformValue::Text(v)
    }
}
