//! Registry of named filters.
//!
//! The catalog is a read-only table assembled once, on first use, by
//! [`CatalogBuilder`]. Each entry pairs a filter name with its description, its
//! ordered parameter list and a constructor that binds validated parameter
//! values into a [`Filter`].

use crate::color::Rgb;
use crate::config::{AsciiConfig, BlurConfig, MAX_BLUR_RADIUS, MAX_SIGMA, PixelateConfig};
use crate::error::{FilterError, Result, check_range};
use crate::filters::Filter;
use std::sync::OnceLock;

/// Accepted values of one parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParamKind {
    Int { min: i64, max: i64, default: i64 },
    Float { min: f64, max: f64, default: f64 },
    /// Boolean switch, off unless given.
    Flag,
    /// Six-digit hex color.
    Hex { default: &'static str },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: ParamKind,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Flag(bool),
    Hex(Rgb),
}

/// Resolved parameter values for one invocation, defaults filled in.
#[derive(Clone, Debug, Default)]
pub struct ParamValues {
    filter: &'static str,
    values: Vec<(&'static str, ParamValue)>,
}

impl ParamValues {
    fn lookup(&self, name: &str) -> Result<ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| FilterError::UnknownParameter {
                filter: self.filter.to_string(),
                param: name.to_string(),
            })
    }

    fn mismatch(&self, name: &str, value: ParamValue) -> FilterError {
        FilterError::InvalidParameterValue {
            filter: self.filter.to_string(),
            param: name.to_string(),
            value: format!("{value:?}"),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.lookup(name)? {
            ParamValue::Int(v) => Ok(v),
            other => Err(self.mismatch(name, other)),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.lookup(name)? {
            ParamValue::Float(v) => Ok(v),
            other => Err(self.mismatch(name, other)),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.lookup(name)? {
            ParamValue::Flag(v) => Ok(v),
            other => Err(self.mismatch(name, other)),
        }
    }

    pub fn hex(&self, name: &str) -> Result<Rgb> {
        match self.lookup(name)? {
            ParamValue::Hex(v) => Ok(v),
            other => Err(self.mismatch(name, other)),
        }
    }
}

type BuildFn = fn(&ParamValues) -> Result<Filter>;

/// One named filter.
#[derive(Clone, Debug)]
pub struct FilterEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    build: BuildFn,
}

impl FilterEntry {
    /// Binds `args` (name, raw value) into a filter; omitted parameters take
    /// their defaults.
    pub fn build(&self, args: &[(&str, &str)]) -> Result<Filter> {
        let mut values = ParamValues {
            filter: self.name,
            values: self
                .params
                .iter()
                .map(|p| default_value(p).map(|v| (p.name, v)))
                .collect::<Result<_>>()?,
        };

        for &(key, raw) in args {
            let spec = self
                .params
                .iter()
                .find(|p| p.name == key)
                .ok_or_else(|| FilterError::UnknownParameter {
                    filter: self.name.to_string(),
                    param: key.to_string(),
                })?;
            let value = self.parse_value(spec, raw)?;
            if let Some(slot) = values.values.iter_mut().find(|(n, _)| *n == spec.name) {
                slot.1 = value;
            }
        }

        (self.build)(&values)
    }

    fn parse_value(&self, spec: &ParamSpec, raw: &str) -> Result<ParamValue> {
        let raw = raw.trim();
        let invalid = || FilterError::InvalidParameterValue {
            filter: self.name.to_string(),
            param: spec.name.to_string(),
            value: raw.to_string(),
        };
        match spec.kind {
            ParamKind::Int { min, max, .. } => {
                let v: i64 = raw.parse().map_err(|_| invalid())?;
                check_range(spec.name, v as f64, min as f64, max as f64)?;
                Ok(ParamValue::Int(v))
            }
            ParamKind::Float { min, max, .. } => {
                let v: f64 = raw.parse().map_err(|_| invalid())?;
                check_range(spec.name, v, min, max)?;
                Ok(ParamValue::Float(v))
            }
            ParamKind::Flag => match raw.to_ascii_lowercase().as_str() {
                "" | "true" | "1" | "yes" | "on" => Ok(ParamValue::Flag(true)),
                "false" | "0" | "no" | "off" => Ok(ParamValue::Flag(false)),
                _ => Err(invalid()),
            },
            ParamKind::Hex { .. } => Ok(ParamValue::Hex(Rgb::from_hex(raw)?)),
        }
    }
}

fn default_value(spec: &ParamSpec) -> Result<ParamValue> {
    Ok(match spec.kind {
        ParamKind::Int { default, .. } => ParamValue::Int(default),
        ParamKind::Float { default, .. } => ParamValue::Float(default),
        ParamKind::Flag => ParamValue::Flag(false),
        ParamKind::Hex { default } => ParamValue::Hex(Rgb::from_hex(default)?),
    })
}

/// Read-only table of filters.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<FilterEntry>,
}

impl Catalog {
    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Looks up `name` and binds `args`.
    pub fn build(&self, name: &str, args: &[(&str, &str)]) -> Result<Filter> {
        self.get(name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?
            .build(args)
    }

    /// Parses `name` or `name:param=value,param=value`.
    ///
    /// A parameter without `=` is a flag set to true.
    pub fn parse_invocation(&self, invocation: &str) -> Result<Filter> {
        let (name, rest) = match invocation.split_once(':') {
            Some((name, rest)) => (name.trim(), rest),
            None => (invocation.trim(), ""),
        };
        let args: Vec<(&str, &str)> = rest
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (part, ""),
            })
            .collect();
        self.build(name, &args)
    }

    /// Parses a sequence of invocations into an ordered chain.
    pub fn parse_chain<S: AsRef<str>>(&self, invocations: &[S]) -> Result<Vec<Filter>> {
        invocations
            .iter()
            .map(|inv| self.parse_invocation(inv.as_ref()))
            .collect()
    }
}

/// Assembles a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<FilterEntry>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        name: &'static str,
        description: &'static str,
        params: &'static [ParamSpec],
        build: BuildFn,
    ) -> Self {
        debug_assert!(
            self.entries.iter().all(|e| e.name != name),
            "duplicate filter {name}"
        );
        self.entries.push(FilterEntry {
            name,
            description,
            params,
            build,
        });
        self
    }

    pub fn build(self) -> Catalog {
        Catalog {
            entries: self.entries,
        }
    }

    /// Registers every built-in filter.
    pub fn with_builtin_filters(self) -> Self {
        self.register(
            "pixelate",
            "Transforms an image into a pixelated version",
            PIXELATE_PARAMS,
            |v| {
                Ok(Filter::Pixelate(PixelateConfig {
                    divs: v.int("divs")? as u32,
                }))
            },
        )
        .register(
            "ascii",
            "Transforms an image into ASCII art",
            ASCII_PARAMS,
            |v| {
                Ok(Filter::Ascii(AsciiConfig {
                    cols: v.int("cols")? as u32,
                    ratio: v.float("ratio")?,
                }))
            },
        )
        .register(
            "outline",
            "Highlights large differences in pixel values",
            &[],
            |_| Ok(Filter::Outline),
        )
        .register(
            "sharpen",
            "Emphasizes differences in adjacent pixel values",
            &[],
            |_| Ok(Filter::Sharpen),
        )
        .register(
            "contrast",
            "Controls the amount of color differentiation",
            CONTRAST_PARAMS,
            |v| Ok(Filter::Contrast(v.int("value")? as i32)),
        )
        .register(
            "box-blur",
            "Averages each pixel's value with the value of its neighboring pixels",
            BOX_BLUR_PARAMS,
            |v| {
                Ok(Filter::BoxBlur {
                    radius: v.int("radius")? as u32,
                })
            },
        )
        .register(
            "gaussian-blur",
            "Blurs the image by a Gaussian function",
            GAUSSIAN_BLUR_PARAMS,
            |v| {
                let config = BlurConfig {
                    radius: v.int("radius")? as u32,
                    sigma: v.float("sigma")?,
                };
                config.validate()?;
                Ok(Filter::GaussianBlur(config))
            },
        )
        .register(
            "grayscale",
            "Averages the colors of an image to make it grayscale",
            &[],
            |_| Ok(Filter::Grayscale),
        )
        .register(
            "invert",
            "Inverts the colors of the image",
            &[],
            |_| Ok(Filter::Invert),
        )
        .register(
            "sepia",
            "Adds a warm brown tone to the image",
            &[],
            |_| Ok(Filter::Sepia),
        )
        .register(
            "color",
            "Replaces all existing color with the corresponding shades of a new color",
            COLOR_PARAMS,
            |v| Ok(Filter::Color(v.hex("hex")?)),
        )
        .register(
            "enable-channels",
            "Specify channels to enable in an image",
            ENABLE_CHANNELS_PARAMS,
            |v| {
                Ok(Filter::EnableChannels {
                    red: v.flag("red")?,
                    green: v.flag("green")?,
                    blue: v.flag("blue")?,
                })
            },
        )
        .register(
            "octopus-dragon",
            "Shifts the colors to mix of blue and orange tones",
            &[],
            |_| Ok(Filter::OctopusDragon),
        )
    }
}

const PIXELATE_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "divs",
    help: "The number of times the image will be divided on the longest side",
    kind: ParamKind::Int {
        min: 1,
        max: u32::MAX as i64,
        default: 100,
    },
}];

const ASCII_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "cols",
        help: "The number of characters along the width",
        kind: ParamKind::Int {
            min: 1,
            max: u32::MAX as i64,
            default: 80,
        },
    },
    ParamSpec {
        name: "ratio",
        help: "The width/height ratio to stretch the image by",
        kind: ParamKind::Float {
            min: 0.1,
            max: 10.0,
            default: 2.0,
        },
    },
];

const CONTRAST_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "value",
    help: "The contrast value (-255 - 255)",
    kind: ParamKind::Int {
        min: -255,
        max: 255,
        default: 0,
    },
}];

const RADIUS_PARAM: ParamSpec = ParamSpec {
    name: "radius",
    help: "Radius of the kernel",
    kind: ParamKind::Int {
        min: 1,
        max: MAX_BLUR_RADIUS as i64,
        default: 1,
    },
};

const BOX_BLUR_PARAMS: &[ParamSpec] = &[RADIUS_PARAM];

const GAUSSIAN_BLUR_PARAMS: &[ParamSpec] = &[
    RADIUS_PARAM,
    ParamSpec {
        name: "sigma",
        help: "Standard deviation of the Gaussian distribution",
        kind: ParamKind::Float {
            min: 0.0,
            max: MAX_SIGMA,
            default: 0.3,
        },
    },
];

const COLOR_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "hex",
    help: "The desired color as a hexadecimal value",
    kind: ParamKind::Hex { default: "000000" },
}];

const ENABLE_CHANNELS_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "red",
        help: "Whether to enable the red channel",
        kind: ParamKind::Flag,
    },
    ParamSpec {
        name: "green",
        help: "Whether to enable the green channel",
        kind: ParamKind::Flag,
    },
    ParamSpec {
        name: "blue",
        help: "Whether to enable the blue channel",
        kind: ParamKind::Flag,
    },
];

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// The process-wide catalog of built-in filters.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| CatalogBuilder::new().with_builtin_filters().build())
}
