//! Named probability distributions used by the sampling generators.
//!
//! Distributions are looked up by their scipy-style name and built from
//! keyword arguments, e.g. `{distribution: norm, loc: 50, scale: 1}`.
//! Continuous distributions accept `loc` and `scale` on top of their shape
//! parameters and map a quantile `q` to `loc + scale * ppf_standard(q)`.
//! Discrete distributions accept `loc` only and produce integers.
//!
//! | Name | Shape kwargs | Output |
//! |------|--------------|--------|
//! | `norm` | none | float |
//! | `uniform` | none | float |
//! | `lognorm` | `s` | float |
//! | `expon` | none | float |
//! | `gamma` | `a` | float |
//! | `beta` | `a`, `b` | float |
//! | `weibull_min` | `c` | float |
//! | `cauchy` | none | float |
//! | `laplace` | none | float |
//! | `logistic` | none | float |
//! | `gumbel_r` | none | float |
//! | `t` | `df` | float |
//! | `chi2` | `df` | float |
//! | `triang` | `c` | float |
//! | `pareto` | `b` | float |
//! | `poisson` | `mu` | int |
//! | `binom` | `n`, `p` | int |
//! | `geom` | `p` | int |
//! | `randint` | `low`, `high` (no `loc`) | int |

use std::collections::BTreeMap;

use statrs::distribution::{
    Beta, Binomial, ChiSquared, ContinuousCDF, DiscreteCDF, Gamma, Normal, Poisson, StudentsT,
};

use crate::error::{Error, Result};
use crate::value::Value;

/// Every distribution name the catalog resolves.
pub const DISTRIBUTION_NAMES: &[&str] = &[
    "norm",
    "uniform",
    "lognorm",
    "expon",
    "gamma",
    "beta",
    "weibull_min",
    "cauchy",
    "laplace",
    "logistic",
    "gumbel_r",
    "t",
    "chi2",
    "triang",
    "pareto",
    "poisson",
    "binom",
    "geom",
    "randint",
];

/// Lowest and highest quantile handed to a percent-point function.
const Q_MIN: f64 = f64::EPSILON;
const Q_MAX: f64 = 1.0 - f64::EPSILON;

/// Standardized (loc = 0, scale = 1) continuous shapes.
#[derive(Clone, Debug)]
enum Continuous {
    Normal(Normal),
    Uniform,
    LogNormal { s: f64, normal: Normal },
    Exponential,
    Gamma(Gamma),
    Beta(Beta),
    Weibull { c: f64 },
    Cauchy,
    Laplace,
    Logistic,
    Gumbel,
    StudentsT(StudentsT),
    ChiSquared(ChiSquared),
    Triangular { c: f64 },
    Pareto { b: f64 },
}

impl Continuous {
    fn ppf(&self, q: f64) -> f64 {
        match self {
            Self::Normal(d) => d.inverse_cdf(q),
            Self::Uniform => q,
            Self::LogNormal { s, normal } => (s * normal.inverse_cdf(q)).exp(),
            Self::Exponential => -(1.0 - q).ln(),
            Self::Gamma(d) => d.inverse_cdf(q),
            Self::Beta(d) => d.inverse_cdf(q),
            Self::Weibull { c } => (-(1.0 - q).ln()).powf(1.0 / c),
            Self::Cauchy => (core::f64::consts::PI * (q - 0.5)).tan(),
            Self::Laplace => {
                if q < 0.5 {
                    (2.0 * q).ln()
                } else {
                    -(2.0 * (1.0 - q)).ln()
                }
            }
            Self::Logistic => (q / (1.0 - q)).ln(),
            Self::Gumbel => -(-q.ln()).ln(),
            Self::StudentsT(d) => d.inverse_cdf(q),
            Self::ChiSquared(d) => d.inverse_cdf(q),
            Self::Triangular { c } => {
                if q < *c {
                    (q * c).sqrt()
                } else {
                    1.0 - ((1.0 - q) * (1.0 - c)).sqrt()
                }
            }
            Self::Pareto { b } => (1.0 - q).powf(-1.0 / b),
        }
    }
}

/// Integer-valued shapes.
#[derive(Clone, Debug)]
enum Discrete {
    Poisson(Poisson),
    Binomial(Binomial),
    Geometric { p: f64 },
    RandInt { low: i64, high: i64 },
}

impl Discrete {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn ppf(&self, q: f64) -> i64 {
        match self {
            Self::Poisson(d) => i64::try_from(d.inverse_cdf(q)).unwrap_or(i64::MAX),
            Self::Binomial(d) => i64::try_from(d.inverse_cdf(q)).unwrap_or(i64::MAX),
            Self::Geometric { p } => {
                if *p >= 1.0 {
                    1
                } else {
                    ((1.0 - q).ln() / (1.0 - p).ln()).ceil().max(1.0) as i64
                }
            }
            Self::RandInt { low, high } => {
                // Bounds may span more than i64::MAX; float-to-int casts saturate.
                #[allow(clippy::cast_precision_loss)]
                let (low_f, high_f) = (*low as f64, *high as f64);
                let value = (low_f + (q * (high_f - low_f)).floor()) as i64;
                value.clamp(*low, high - 1)
            }
        }
    }
}

#[derive(Clone, Debug)]
enum Shape {
    Continuous(Continuous),
    Discrete(Discrete),
}

/// A fully parameterised distribution from the catalog.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use parameter_study::distribution::Distribution;
/// use parameter_study::Value;
///
/// let kwargs = BTreeMap::from([("loc".to_owned(), 10.0), ("scale".to_owned(), 2.0)]);
/// let dist = Distribution::from_kwargs("width", "norm", &kwargs).unwrap();
/// assert_eq!(dist.ppf(0.5), Value::Float(10.0));
/// ```
#[derive(Clone, Debug)]
pub struct Distribution {
    name: String,
    shape: Shape,
    loc: f64,
    scale: f64,
}

/// Consumes keyword arguments one name at a time and rejects leftovers.
struct Kwargs<'a> {
    parameter: &'a str,
    distribution: &'a str,
    remaining: BTreeMap<&'a str, f64>,
}

impl<'a> Kwargs<'a> {
    fn new(parameter: &'a str, distribution: &'a str, kwargs: &'a BTreeMap<String, f64>) -> Self {
        Self {
            parameter,
            distribution,
            remaining: kwargs.iter().map(|(k, v)| (k.as_str(), *v)).collect(),
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidDistribution {
            parameter: self.parameter.to_owned(),
            distribution: self.distribution.to_owned(),
            reason: reason.into(),
        }
    }

    fn required(&mut self, name: &str) -> Result<f64> {
        self.remaining
            .remove(name)
            .ok_or_else(|| self.invalid(format!("missing required argument '{name}'")))
    }

    fn optional(&mut self, name: &str, default: f64) -> f64 {
        self.remaining.remove(name).unwrap_or(default)
    }

    fn positive(&mut self, name: &str) -> Result<f64> {
        let value = self.required(name)?;
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(self.invalid(format!("'{name}' must be positive and finite, got {value}")))
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integer(&mut self, name: &str) -> Result<i64> {
        let value = self.required(name)?;
        if value.fract() == 0.0 && value.is_finite() {
            Ok(value as i64)
        } else {
            Err(self.invalid(format!("'{name}' must be an integer, got {value}")))
        }
    }

    fn probability(&mut self, name: &str) -> Result<f64> {
        let value = self.required(name)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(self.invalid(format!("'{name}' must lie in [0, 1], got {value}")))
        }
    }

    fn finish(self) -> Result<()> {
        match self.remaining.keys().next() {
            None => Ok(()),
            Some(extra) => Err(self.invalid(format!("unexpected argument '{extra}'"))),
        }
    }

    fn statrs<T, E: core::fmt::Display>(&self, built: core::result::Result<T, E>) -> Result<T> {
        built.map_err(|e| self.invalid(e.to_string()))
    }
}

impl Distribution {
    /// Returns `true` if `name` is a catalog distribution.
    #[must_use]
    pub fn is_known(name: &str) -> bool {
        DISTRIBUTION_NAMES.contains(&name)
    }

    /// Builds the named distribution from its keyword arguments.
    ///
    /// `parameter` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDistribution`] if `name` is not in the catalog,
    /// and [`Error::InvalidDistribution`] if a shape argument is missing,
    /// out of range or unexpected.
    pub fn from_kwargs(parameter: &str, name: &str, kwargs: &BTreeMap<String, f64>) -> Result<Self> {
        if !Self::is_known(name) {
            return Err(Error::UnknownDistribution {
                parameter: parameter.to_owned(),
                name: name.to_owned(),
            });
        }
        let mut args = Kwargs::new(parameter, name, kwargs);

        let shape = match name {
            "poisson" => {
                let mu = args.positive("mu")?;
                Shape::Discrete(Discrete::Poisson(args.statrs(Poisson::new(mu))?))
            }
            "binom" => {
                let n = args.integer("n")?;
                let p = args.probability("p")?;
                let n = u64::try_from(n).map_err(|_| args.invalid("'n' must be non-negative"))?;
                Shape::Discrete(Discrete::Binomial(args.statrs(Binomial::new(p, n))?))
            }
            "geom" => {
                let p = args.probability("p")?;
                if p == 0.0 {
                    return Err(args.invalid("'p' must be greater than zero"));
                }
                Shape::Discrete(Discrete::Geometric { p })
            }
            "randint" => {
                let low = args.integer("low")?;
                let high = args.integer("high")?;
                if high <= low {
                    return Err(args.invalid(format!("'high' ({high}) must exceed 'low' ({low})")));
                }
                args.finish()?;
                return Ok(Self {
                    name: name.to_owned(),
                    shape: Shape::Discrete(Discrete::RandInt { low, high }),
                    loc: 0.0,
                    scale: 1.0,
                });
            }
            _ => Shape::Continuous(Self::continuous(name, &mut args)?),
        };

        let loc = args.optional("loc", 0.0);
        let scale = match shape {
            Shape::Continuous(_) => args.optional("scale", 1.0),
            Shape::Discrete(_) => 1.0,
        };
        if !loc.is_finite() {
            return Err(args.invalid("'loc' must be finite"));
        }
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(args.invalid(format!("'scale' must be positive and finite, got {scale}")));
        }
        if matches!(shape, Shape::Discrete(_)) && loc.fract() != 0.0 {
            return Err(args.invalid("'loc' must be an integer for discrete distributions"));
        }
        args.finish()?;

        Ok(Self {
            name: name.to_owned(),
            shape,
            loc,
            scale,
        })
    }

    fn continuous(name: &str, args: &mut Kwargs<'_>) -> Result<Continuous> {
        Ok(match name {
            "norm" => Continuous::Normal(args.statrs(Normal::new(0.0, 1.0))?),
            "uniform" => Continuous::Uniform,
            "lognorm" => {
                let s = args.positive("s")?;
                let normal = args.statrs(Normal::new(0.0, 1.0))?;
                Continuous::LogNormal { s, normal }
            }
            "expon" => Continuous::Exponential,
            "gamma" => {
                let a = args.positive("a")?;
                Continuous::Gamma(args.statrs(Gamma::new(a, 1.0))?)
            }
            "beta" => {
                let a = args.positive("a")?;
                let b = args.positive("b")?;
                Continuous::Beta(args.statrs(Beta::new(a, b))?)
            }
            "weibull_min" => Continuous::Weibull {
                c: args.positive("c")?,
            },
            "cauchy" => Continuous::Cauchy,
            "laplace" => Continuous::Laplace,
            "logistic" => Continuous::Logistic,
            "gumbel_r" => Continuous::Gumbel,
            "t" => {
                let df = args.positive("df")?;
                Continuous::StudentsT(args.statrs(StudentsT::new(0.0, 1.0, df))?)
            }
            "chi2" => {
                let df = args.positive("df")?;
                Continuous::ChiSquared(args.statrs(ChiSquared::new(df))?)
            }
            "triang" => {
                let c = args.probability("c")?;
                Continuous::Triangular { c }
            }
            "pareto" => Continuous::Pareto {
                b: args.positive("b")?,
            },
            other => {
                return Err(Error::UnknownDistribution {
                    parameter: args.parameter.to_owned(),
                    name: other.to_owned(),
                });
            }
        })
    }

    /// The catalog name of this distribution.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for integer-valued distributions.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        matches!(self.shape, Shape::Discrete(_))
    }

    /// Percent-point function (inverse CDF).
    ///
    /// `q` is clamped into the open unit interval first, so unbounded
    /// distributions always return finite values.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn ppf(&self, q: f64) -> Value {
        let q = q.clamp(Q_MIN, Q_MAX);
        match &self.shape {
            Shape::Continuous(c) => Value::Float(self.loc + self.scale * c.ppf(q)),
            Shape::Discrete(d) => Value::Int(d.ppf(q).saturating_add(self.loc as i64)),
        }
    }
}
