/// Logistic function, `1 / (1 + e^-z)`.
///
/// Large `|z|` saturates to exactly 0 or 1 through the exponential overflowing to infinity,
/// there is no explicit clamping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn f(&self, z: f64) -> f64 {
        1. / (1. + (-z).exp())
    }

    pub fn df(&self, z: f64) -> f64 {
        let s = self.f(z);
        s * (1. - s)
    }
}
