pub const CHECKOUT_SIGNATURE_HEADER: &str = "x-checkout-signature";
