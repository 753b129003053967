//! Numerical integration routines.
//!
//! Three layers, from cheapest to most careful:
//! - [`trapezoid`]: fixed-node composite trapezoid rule, used inside the
//!   fixed-point boundary iteration where the integrand is evaluated many
//!   thousands of times and a fixed accumulation order keeps results
//!   reproducible.
//! - [`adaptive_simpson`]: classic recursive Simpson with Richardson
//!   error control.
//! - [`adaptive_lobatto`]: adaptive Gauss-Lobatto (Gander-Gautschi style
//!   4/7-point pair), the high-order workhorse for the premium integral.
//!
//! [`integrate`] wires the last two together: Lobatto first, Simpson as
//! the lower-order fallback when Lobatto reports non-convergence.

use crate::types::QuadratureError;

/// Maximum recursion depth for the adaptive routines.
const MAX_DEPTH: usize = 32;

/// Gauss-Lobatto interior abscissa √(2/3), relative to the half-interval.
const LOBATTO_ALPHA: f64 = 0.816_496_580_927_726;

/// Kronrod-extension abscissa 1/√5, relative to the half-interval.
const LOBATTO_BETA: f64 = 0.447_213_595_499_957_94;

/// Composite trapezoid rule with `n` panels (`n + 1` evaluations).
///
/// The accumulation order is fixed left-to-right so repeated runs produce
/// bit-identical sums.
///
/// # Arguments
///
/// * `f` - Integrand
/// * `a` - Lower bound
/// * `b` - Upper bound
/// * `n` - Number of panels (must be ≥ 1)
///
/// # Examples
/// ```
/// use pricer_core::math::quadrature::trapezoid;
///
/// let integral = trapezoid(|x| x * x, 0.0, 1.0, 1000);
/// assert!((integral - 1.0 / 3.0).abs() < 1e-6);
/// ```
pub fn trapezoid<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    assert!(n >= 1, "trapezoid requires at least one panel");
    if a == b {
        return 0.0;
    }
    let h = (b - a) / n as f64;
    let mut sum = 0.5 * (f(a) + f(b));
    for i in 1..n {
        sum += f(a + h * i as f64);
    }
    sum * h
}

/// Adaptive Simpson quadrature with Richardson error control.
///
/// # Arguments
///
/// * `f` - Integrand
/// * `a` - Lower bound
/// * `b` - Upper bound
/// * `tolerance` - Absolute error target
///
/// # Returns
///
/// * `Ok(value)` - Integral estimate within tolerance
/// * `Err(QuadratureError::InvalidInterval)` - Non-finite or reversed bounds
/// * `Err(QuadratureError::ToleranceNotReached)` - Depth budget exhausted
///
/// # Examples
/// ```
/// use pricer_core::math::quadrature::adaptive_simpson;
///
/// let integral = adaptive_simpson(|x: f64| x.sin(), 0.0, std::f64::consts::PI, 1e-10).unwrap();
/// assert!((integral - 2.0).abs() < 1e-9);
/// ```
pub fn adaptive_simpson<F>(f: F, a: f64, b: f64, tolerance: f64) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_interval(a, b)?;
    if a == b {
        return Ok(0.0);
    }
    let m = 0.5 * (a + b);
    let fa = eval(&f, a)?;
    let fm = eval(&f, m)?;
    let fb = eval(&f, b)?;
    let whole = simpson_rule(a, b, fa, fm, fb);
    simpson_step(&f, a, b, fa, fm, fb, whole, tolerance, MAX_DEPTH)
}

/// Adaptive Gauss-Lobatto quadrature.
///
/// Uses the 4-point Gauss-Lobatto rule paired with its 7-point Kronrod
/// extension; intervals whose pair disagrees beyond the local tolerance
/// are split into six subintervals at the extension nodes.
///
/// # Arguments
///
/// * `f` - Integrand
/// * `a` - Lower bound
/// * `b` - Upper bound
/// * `tolerance` - Absolute error target
///
/// # Returns
///
/// * `Ok(value)` - Integral estimate within tolerance
/// * `Err(QuadratureError)` - Invalid interval, non-finite integrand, or
///   depth budget exhausted above tolerance
///
/// # Examples
/// ```
/// use pricer_core::math::quadrature::adaptive_lobatto;
///
/// let integral = adaptive_lobatto(|x: f64| (-x).exp(), 0.0, 5.0, 1e-10).unwrap();
/// assert!((integral - (1.0 - (-5.0f64).exp())).abs() < 1e-9);
/// ```
pub fn adaptive_lobatto<F>(f: F, a: f64, b: f64, tolerance: f64) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_interval(a, b)?;
    if a == b {
        return Ok(0.0);
    }
    let fa = eval(&f, a)?;
    let fb = eval(&f, b)?;
    lobatto_step(&f, a, b, fa, fb, tolerance, MAX_DEPTH)
}

/// Quadrature provider contract: adaptive high-order integration with a
/// lower-order fallback on non-convergence.
///
/// Tries [`adaptive_lobatto`] first; if it fails to converge, retries with
/// [`adaptive_simpson`] at a 10x relaxed tolerance before giving up.
///
/// # Examples
/// ```
/// use pricer_core::math::quadrature::integrate;
///
/// let integral = integrate(|x: f64| x.exp(), 0.0, 1.0, 1e-9).unwrap();
/// assert!((integral - (std::f64::consts::E - 1.0)).abs() < 1e-8);
/// ```
pub fn integrate<F>(f: F, a: f64, b: f64, tolerance: f64) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    match adaptive_lobatto(&f, a, b, tolerance) {
        Ok(v) => Ok(v),
        Err(QuadratureError::InvalidInterval { a, b }) => {
            Err(QuadratureError::InvalidInterval { a, b })
        }
        Err(_) => adaptive_simpson(&f, a, b, tolerance * 10.0),
    }
}

fn check_interval(a: f64, b: f64) -> Result<(), QuadratureError> {
    if !a.is_finite() || !b.is_finite() || a > b {
        return Err(QuadratureError::InvalidInterval { a, b });
    }
    Ok(())
}

fn eval<F>(f: &F, x: f64) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    let y = f(x);
    if y.is_finite() {
        Ok(y)
    } else {
        Err(QuadratureError::NonFiniteIntegrand { x })
    }
}

#[inline]
fn simpson_rule(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn simpson_step<F>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tolerance: f64,
    depth: usize,
) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = eval(f, lm)?;
    let frm = eval(f, rm)?;
    let left = simpson_rule(a, m, fa, flm, fm);
    let right = simpson_rule(m, b, fm, frm, fb);
    let delta = left + right - whole;

    if delta.abs() <= 15.0 * tolerance {
        return Ok(left + right + delta / 15.0);
    }
    if depth == 0 {
        return Err(QuadratureError::ToleranceNotReached {
            tolerance,
            achieved: delta.abs() / 15.0,
        });
    }
    let half_tol = 0.5 * tolerance;
    let l = simpson_step(f, a, m, fa, flm, fm, left, half_tol, depth - 1)?;
    let r = simpson_step(f, m, b, fm, frm, fb, right, half_tol, depth - 1)?;
    Ok(l + r)
}

fn lobatto_step<F>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fb: f64,
    tolerance: f64,
    depth: usize,
) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    let m = 0.5 * (a + b);
    let h = 0.5 * (b - a);

    let mll = m - LOBATTO_ALPHA * h;
    let ml = m - LOBATTO_BETA * h;
    let mr = m + LOBATTO_BETA * h;
    let mrr = m + LOBATTO_ALPHA * h;

    let fmll = eval(f, mll)?;
    let fml = eval(f, ml)?;
    let fm = eval(f, m)?;
    let fmr = eval(f, mr)?;
    let fmrr = eval(f, mrr)?;

    // 4-point Gauss-Lobatto and its 7-point Kronrod extension.
    let i2 = h / 6.0 * (fa + fb + 5.0 * (fml + fmr));
    let i1 = h / 1470.0
        * (77.0 * (fa + fb) + 432.0 * (fmll + fmrr) + 625.0 * (fml + fmr) + 672.0 * fm);

    let err = (i1 - i2).abs();
    if err <= tolerance || h.abs() < f64::EPSILON * m.abs().max(1.0) {
        return Ok(i1);
    }
    if depth == 0 {
        return Err(QuadratureError::ToleranceNotReached {
            tolerance,
            achieved: err,
        });
    }

    // Split at the extension nodes; tolerance is shared across children.
    let child_tol = tolerance / 6.0;
    let mut total = 0.0;
    let nodes = [a, mll, ml, m, mr, mrr, b];
    let values = [fa, fmll, fml, fm, fmr, fmrr, fb];
    for i in 0..6 {
        total += lobatto_step(
            f,
            nodes[i],
            nodes[i + 1],
            values[i],
            values[i + 1],
            child_tol,
            depth - 1,
        )?;
    }
    Ok(total)
}
