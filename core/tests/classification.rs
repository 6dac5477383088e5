use retailrag_core::model::BrandTier;
use retailrag_core::status::{RagStatus, TrendDirection};
use retailrag_core::thresholds::{classify, thresholds_for};
use retailrag_core::trend::{apply_penalty, direction};

const ALL_TIERS: [BrandTier; 5] = [
    BrandTier::APlus,
    BrandTier::A,
    BrandTier::B,
    BrandTier::C,
    BrandTier::D,
];

const ALL_STATUSES: [RagStatus; 3] = [RagStatus::Green, RagStatus::Amber, RagStatus::Red];

#[test]
fn green_floor_is_inclusive() {
    for tier in ALL_TIERS {
        let t = thresholds_for(tier);
        assert_eq!(
            classify(tier, t.green_floor),
            RagStatus::Green,
            "tier {tier} at its green floor"
        );
        assert_eq!(classify(tier, t.amber_floor), RagStatus::Amber);
        assert_eq!(classify(tier, t.amber_floor - 0.01), RagStatus::Red);
    }
}

#[test]
fn classifier_is_monotone_in_attach_rate() {
    for tier in ALL_TIERS {
        let mut last_severity = u8::MAX;
        let mut rate = 0.0;
        while rate <= 40.0 {
            let severity = classify(tier, rate).severity();
            assert!(
                severity <= last_severity,
                "tier {tier}: severity rose from {last_severity} to {severity} at rate {rate}"
            );
            last_severity = severity;
            rate += 0.25;
        }
    }
}

#[test]
fn threshold_table_matches_tier_cut_points() {
    let cases = [
        (BrandTier::APlus, 25.0, 12.0),
        (BrandTier::A, 20.0, 12.0),
        (BrandTier::B, 16.0, 12.0),
        (BrandTier::C, 14.0, 10.0),
        (BrandTier::D, 10.0, 3.0),
    ];
    for (tier, green, amber) in cases {
        let t = thresholds_for(tier);
        assert_eq!(t.green_floor, green);
        assert_eq!(t.amber_floor, amber);
    }
}

#[test]
fn unknown_tier_label_fails_fast() {
    assert!("A+".parse::<BrandTier>().is_ok());
    assert!(" b ".parse::<BrandTier>().is_ok());
    assert!("E".parse::<BrandTier>().is_err());
    assert!("".parse::<BrandTier>().is_err());
    assert!("platinum".parse::<BrandTier>().is_err());
}

#[test]
fn penalty_is_idempotent() {
    let rate_pairs = [(22.0, 25.0), (0.0, 0.0), (14.0, 10.0), (5.0, 9.0), (9.0, 0.0)];
    for status in ALL_STATUSES {
        for (current, previous) in rate_pairs {
            let once = apply_penalty(status, current, previous);
            let twice = apply_penalty(once, current, previous);
            assert_eq!(once, twice, "{status} with ({current}, {previous})");
        }
    }
}

#[test]
fn penalty_never_improves_a_status() {
    let rate_pairs = [(22.0, 25.0), (0.0, 0.0), (14.0, 10.0), (5.0, 9.0), (9.0, 0.0)];
    for status in ALL_STATUSES {
        for (current, previous) in rate_pairs {
            let after = apply_penalty(status, current, previous);
            assert!(
                after.severity() >= status.severity(),
                "{status} improved to {after} with ({current}, {previous})"
            );
        }
    }
}

#[test]
fn scenario_tier_a_declining_green_becomes_amber() {
    let base = classify(BrandTier::A, 22.0);
    assert_eq!(base, RagStatus::Green);

    let final_status = apply_penalty(base, 22.0, 25.0);
    assert_eq!(final_status, RagStatus::Amber);
    assert_eq!(direction(22.0, 25.0), TrendDirection::Declined);
}

#[test]
fn scenario_tier_d_zero_data_is_red_stable() {
    let base = classify(BrandTier::D, 0.0);
    assert_eq!(base, RagStatus::Red);

    let final_status = apply_penalty(base, 0.0, 0.0);
    assert_eq!(final_status, RagStatus::Red);
    assert_eq!(direction(0.0, 0.0), TrendDirection::Stable);
}

#[test]
fn scenario_tier_c_improving_green_stays_green() {
    let base = classify(BrandTier::C, 14.0);
    assert_eq!(base, RagStatus::Green);

    let final_status = apply_penalty(base, 14.0, 10.0);
    assert_eq!(final_status, RagStatus::Green);
    assert_eq!(direction(14.0, 10.0), TrendDirection::Improved);
}
