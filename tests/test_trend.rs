//! Least-squares trend line tests.

use commodity_overview::trend::fit_linear;

#[test]
fn exact_line_is_recovered() {
    let xs = [0.0, 1.0, 2.0, 3.0];
    let ys = [1.0, 3.0, 5.0, 7.0];
    let fit = fit_linear(&xs, &ys).unwrap();
    assert!((fit.slope - 2.0).abs() < 1e-12);
    assert!((fit.intercept - 1.0).abs() < 1e-12);
    assert!((fit.evaluate(10.0) - 21.0).abs() < 1e-9);
}

#[test]
fn residuals_sum_to_zero() {
    // Day ordinals around 2024, noisy values.
    let xs = [19723.0, 19754.0, 19783.0, 19814.0, 19844.0, 19875.0, 19905.0];
    let ys = [2051.3, 2034.0, 2215.9, 2286.2, 2327.3, 2330.9, 2426.5];
    let fit = fit_linear(&xs, &ys).unwrap();
    let sum: f64 = fit.residuals(&xs, &ys).iter().sum();
    assert!(sum.abs() < 1e-6, "residual sum {sum}");
    assert!(fit.slope > 0.0);
}

#[test]
fn two_points_define_the_line() {
    let fit = fit_linear(&[10.0, 20.0], &[5.0, 0.0]).unwrap();
    assert!((fit.slope + 0.5).abs() < 1e-12);
    assert!((fit.evaluate(10.0) - 5.0).abs() < 1e-12);
}

#[test]
fn fewer_than_two_points_has_no_fit() {
    assert!(fit_linear(&[], &[]).is_none());
    assert!(fit_linear(&[1.0], &[3.0]).is_none());
}

#[test]
fn degenerate_input_has_no_fit() {
    assert!(fit_linear(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_none());
    assert!(fit_linear(&[1.0, 2.0], &[1.0]).is_none());
    assert!(fit_linear(&[1.0, 2.0], &[1.0, f64::NAN]).is_none());
}
