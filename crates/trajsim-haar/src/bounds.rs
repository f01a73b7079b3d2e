//! Lower and upper bounds on the squared Euclidean distance between two
//! series, derived from their Haar decompositions.
//!
//! At depth `r` the bottom-up levels `r..=n` are "read" and contribute their
//! exact weighted squared difference `D_r`. The finer levels `1..r` are
//! "unread"; their contribution `sigmaL(q) + sigmaL(p) - 2 * <q, p>` is bounded
//! by splitting the cross term by coefficient sign and applying
//! Cauchy-Schwarz:
//!
//! ```text
//! lower = D_r + sigmaL(p) + sigmaL(q) - 2 * sqrt(sigmaP * sigmaEqual)
//! upper = D_r + sigmaL(p) + sigmaL(q) + 2 * sqrt(sigmaP * sigmaOpposite)
//! ```
//!
//! At depth 1 nothing is unread and both bounds equal the exact distance.

use crate::error::HaarError;
use crate::level::{level_weight, sign};
use crate::series::HaarSeries;

/// Weight applied to the sign-restricted query energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignWeighting {
    /// Weight `2^level` with `sigmaP` the `2^level`-weighted candidate
    /// energy of the unread levels. The bounds always hold.
    #[default]
    Dyadic,

    /// Weight `2^(2^level)` with unweighted `sigmaP`. Overflows `f64` from
    /// level 10 on and is not guaranteed to bracket the true distance.
    DoublyExponential,
}

impl SignWeighting {
    fn weight(self, level: u32) -> Result<f64, HaarError> {
        match self {
            Self::Dyadic => Ok(level_weight(level)),
            Self::DoublyExponential if level >= 10 => Err(HaarError::WeightOverflow { level }),
            Self::DoublyExponential => Ok(2f64.powi(1 << level)),
        }
    }
}

/// Bracket around the squared Euclidean distance of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Value the true distance cannot fall below.
    pub lower: f64,
    /// Value the true distance cannot exceed.
    pub upper: f64,
}

impl Bounds {
    /// Return true if `distance` lies inside the bracket, allowing `tolerance`
    /// of floating-point slack on either side.
    #[must_use]
    pub fn contains(&self, distance: f64, tolerance: f64) -> bool {
        self.lower - tolerance <= distance && distance <= self.upper + tolerance
    }
}

/// Query energy over the unread levels, split by whether the query and
/// candidate coefficients share a sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignSums {
    /// Weighted query energy where signs agree.
    pub equal: f64,
    /// Weighted query energy where signs differ.
    pub opposite: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct LevelSums {
    diff: f64,
    query: f64,
    candidate: f64,
    equal: f64,
    opposite: f64,
}

/// Unweighted per-level sums for one (query, candidate) pair.
///
/// Built once in O(N); bounds for any depth then cost O(levels).
#[derive(Debug, Clone)]
pub struct PairProfile {
    // Index `level - 1` holds bottom-up level `level`.
    levels: Vec<LevelSums>,
}

impl PairProfile {
    /// Collect the per-level sums of `query` against `candidate`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::LengthMismatch`] | The two decompositions differ in length |
    pub fn new(query: &HaarSeries, candidate: &HaarSeries) -> Result<Self, HaarError> {
        query.check_same_len(candidate)?;

        let levels = (1..=query.levels())
            .map(|level| {
                let q = query.level_unchecked(level);
                let p = candidate.level_unchecked(level);
                q.iter().zip(p).fold(LevelSums::default(), |mut acc, (&qi, &pi)| {
                    acc.diff += (qi - pi).powi(2);
                    acc.query += qi * qi;
                    acc.candidate += pi * pi;
                    if sign(qi) == sign(pi) {
                        acc.equal += qi * qi;
                    } else {
                        acc.opposite += qi * qi;
                    }
                    acc
                })
            })
            .collect();

        Ok(Self { levels })
    }

    /// Return the number of levels covered.
    #[must_use]
    pub fn levels(&self) -> u32 {
        self.levels.len() as u32
    }

    fn check_depth(&self, depth: u32) -> Result<(), HaarError> {
        if depth == 0 || depth > self.levels() {
            return Err(HaarError::InvalidDepth {
                depth,
                max_depth: self.levels(),
            });
        }
        Ok(())
    }

    fn sums(&self, level: u32) -> &LevelSums {
        &self.levels[level as usize - 1]
    }

    /// `D_r`: weighted squared difference over the read levels `depth..=n`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels()` |
    pub fn partial_distance(&self, depth: u32) -> Result<f64, HaarError> {
        self.check_depth(depth)?;
        Ok((depth..=self.levels())
            .map(|l| level_weight(l) * self.sums(l).diff)
            .sum())
    }

    /// Weighted sign sums over the unread levels `1..depth`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels()` |
    /// | [`HaarError::WeightOverflow`] | A level weight, or the sum it scales, does not fit in an `f64` |
    pub fn sign_sums(&self, depth: u32, weighting: SignWeighting) -> Result<SignSums, HaarError> {
        self.check_depth(depth)?;
        let mut out = SignSums {
            equal: 0.0,
            opposite: 0.0,
        };
        for level in 1..depth {
            let w = weighting.weight(level)?;
            out.equal += w * self.sums(level).equal;
            out.opposite += w * self.sums(level).opposite;
            if !out.equal.is_finite() || !out.opposite.is_finite() {
                return Err(HaarError::WeightOverflow { level });
            }
        }
        Ok(out)
    }

    /// Lower and upper bounds at `depth`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels()` |
    /// | [`HaarError::WeightOverflow`] | A level weight does not fit in an `f64` |
    pub fn bounds(&self, depth: u32, weighting: SignWeighting) -> Result<Bounds, HaarError> {
        let partial = self.partial_distance(depth)?;
        let signs = self.sign_sums(depth, weighting)?;

        let unread = 1..depth;
        let sigma_q: f64 = unread.clone().map(|l| level_weight(l) * self.sums(l).query).sum();
        let sigma_p: f64 = unread.clone().map(|l| level_weight(l) * self.sums(l).candidate).sum();
        let sigma_p_cross = match weighting {
            SignWeighting::Dyadic => sigma_p,
            SignWeighting::DoublyExponential => unread.map(|l| self.sums(l).candidate).sum(),
        };

        let base = partial + sigma_p + sigma_q;
        Ok(Bounds {
            lower: base - 2.0 * (sigma_p_cross * signs.equal).sqrt(),
            upper: base + 2.0 * (sigma_p_cross * signs.opposite).sqrt(),
        })
    }
}

/// `D_r` for one pair; see [`PairProfile::partial_distance`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::LengthMismatch`] | The two decompositions differ in length |
/// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels` |
pub fn partial_distance(query: &HaarSeries, candidate: &HaarSeries, depth: u32) -> Result<f64, HaarError> {
    PairProfile::new(query, candidate)?.partial_distance(depth)
}

/// `sigmaL`: `2^level`-weighted energy of `series` over the unread levels `1..depth`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels` |
pub fn unread_energy(series: &HaarSeries, depth: u32) -> Result<f64, HaarError> {
    if depth == 0 || depth > series.levels() {
        return Err(HaarError::InvalidDepth {
            depth,
            max_depth: series.levels(),
        });
    }
    Ok((1..depth)
        .map(|l| level_weight(l) * series.level_unchecked(l).iter().map(|c| c * c).sum::<f64>())
        .sum())
}

/// Weighted sign sums for one pair; see [`PairProfile::sign_sums`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::LengthMismatch`] | The two decompositions differ in length |
/// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels` |
/// | [`HaarError::WeightOverflow`] | A level weight does not fit in an `f64` |
pub fn sign_sums(
    query: &HaarSeries,
    candidate: &HaarSeries,
    depth: u32,
    weighting: SignWeighting,
) -> Result<SignSums, HaarError> {
    PairProfile::new(query, candidate)?.sign_sums(depth, weighting)
}

/// Bounds for one pair at `depth`; see [`PairProfile::bounds`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::LengthMismatch`] | The two decompositions differ in length |
/// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels` |
/// | [`HaarError::WeightOverflow`] | A level weight does not fit in an `f64` |
pub fn bounds(
    query: &HaarSeries,
    candidate: &HaarSeries,
    depth: u32,
    weighting: SignWeighting,
) -> Result<Bounds, HaarError> {
    PairProfile::new(query, candidate)?.bounds(depth, weighting)
}

/// Weighted squared difference over top-down levels `1..=depth`.
///
/// At `depth == levels` this equals [`squared_euclidean`] of the source
/// series.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::LengthMismatch`] | The two decompositions differ in length |
/// | [`HaarError::InvalidDepth`] | `depth` is outside `1..=levels` |
pub fn tree_distance(query: &HaarSeries, candidate: &HaarSeries, depth: u32) -> Result<f64, HaarError> {
    let profile = PairProfile::new(query, candidate)?;
    profile.check_depth(depth)?;
    let n = profile.levels();
    // Top-down level t is bottom-up level n - t + 1.
    Ok((1..=depth)
        .map(|t| {
            let level = n - t + 1;
            level_weight(level) * profile.sums(level).diff
        })
        .sum())
}

/// Sum of squared differences between two raw series.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::LengthMismatch`] | The two series differ in length |
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> Result<f64, HaarError> {
    if a.len() != b.len() {
        return Err(HaarError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum())
}
