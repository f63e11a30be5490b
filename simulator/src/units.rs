//! The (day, AU, Jupiter-mass) unit system everything runs in.

/// Newton's constant in SI, m^3 / (kg s^2)
pub const GRAV_CONSTANT_SI: f64 = 6.67430e-11;
/// One astronomical unit in meters
pub const AU: f64 = 1.495_978_707e11;
/// One day in seconds
pub const DAY: f64 = 86_400.0;
/// One Jupiter mass in kilograms
pub const JUPITER_MASS: f64 = 1.898_124_6e27;

/// G in AU^3 / (Jupiter-mass * day^2).
pub fn gravitational_constant() -> f64 {
    GRAV_CONSTANT_SI * JUPITER_MASS * DAY * DAY / (AU * AU * AU)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_period_is_about_one_and_three_quarter_days() {
        // Kepler's third law with Io's semi-major axis
        let a: f64 = 0.002818623004285437;
        let n = (gravitational_constant() * (1.0 + 4.7e-5) / a.powi(3)).sqrt();
        let period = 2.0 * std::f64::consts::PI / n;
        assert!((period - 1.769).abs() < 0.01, "period was {}", period);
    }
}
