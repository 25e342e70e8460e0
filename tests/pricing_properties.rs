use pos_catalog::pricing::{compute, round2, GST_PERCENTAGE};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(512))]
    #[test]
    fn untaxed_price_is_rounded_base(sell_price in 0.0_f64..1_000_000.0_f64) {
        let pricing = compute(sell_price, false);
        prop_assert_eq!(pricing.gst_percentage, 0);
        prop_assert_eq!(pricing.gst_amount, 0.0);
        prop_assert_eq!(pricing.total_price, round2(sell_price));
    }

    #[test]
    fn taxed_price_adds_rounded_gst(sell_price in 0.0_f64..1_000_000.0_f64) {
        let pricing = compute(sell_price, true);
        let gst_amount = round2(sell_price * 0.05);
        prop_assert_eq!(pricing.gst_percentage, GST_PERCENTAGE);
        prop_assert_eq!(pricing.gst_amount, gst_amount);
        prop_assert_eq!(pricing.total_price, round2(sell_price + gst_amount));
    }

    #[test]
    fn huge_prices_are_never_infinite(sell_price in 1e15_f64..1e300_f64, gst_enabled in any::<bool>()) {
        let pricing = compute(sell_price, gst_enabled);
        prop_assert!(pricing.gst_amount.is_finite());
        prop_assert!(pricing.total_price.is_finite());
        prop_assert!(pricing.total_price >= sell_price);
        if !gst_enabled {
            prop_assert_eq!(pricing.total_price, sell_price);
        }
    }

    #[test]
    fn whole_rupee_prices_are_exact(rupees in 0_u32..100_000_u32) {
        let sell_price = f64::from(rupees);
        let pricing = compute(sell_price, true);
        prop_assert!(pricing.total_price >= sell_price);
        prop_assert!((pricing.total_price - sell_price - pricing.gst_amount).abs() < 0.005 + 1e-9);
    }
}
