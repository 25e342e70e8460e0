use serde::Serialize;

/// Flat GST rate applied when a product has tax enabled, in percent.
pub const GST_PERCENTAGE: i32 = 5;

const GST_RATE: f64 = 0.05;

/// Tax-derived price fields of a product.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub gst_percentage: i32,
    pub gst_amount: f64,
    pub total_price: f64,
}

/// Derives GST and the total price from a base price.
///
/// The caller guarantees `sell_price` is finite and non-negative.
pub fn compute(sell_price: f64, gst_enabled: bool) -> Pricing {
    if gst_enabled {
        let gst_amount = round2(sell_price * GST_RATE);
        Pricing {
            gst_percentage: GST_PERCENTAGE,
            gst_amount,
            total_price: round2(sell_price + gst_amount),
        }
    } else {
        Pricing {
            gst_percentage: 0,
            gst_amount: 0.0,
            total_price: round2(sell_price),
        }
    }
}

/// Magnitude from which an `f64` no longer carries a cent digit.
const CENT_PRECISION_LIMIT: f64 = 1e15;

/// Rounds half away from zero to two decimal places. Values too large to
/// hold cents are returned unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= CENT_PRECISION_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}
