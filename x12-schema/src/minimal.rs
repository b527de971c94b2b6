//! A small, hand-built 005010-flavored catalog used by the test suites of
//! `x12-parser`, `x12-writer`, and `x12-validation`, and by `x12-host`'s
//! example workflow. Not a stand-in for a published implementation guide.

use std::sync::Arc;

use crate::catalog::StaticCatalog;
use crate::container::{FunctionalGroupDef, InterchangeDef, TransactionSetDef};
use crate::element::{ElementDef, ElementKind};
use crate::segment::{ChildDef, ChildUse, ElementUse, ElementUseDef, SegmentDef, SegmentDict};
use crate::usage::{RepeatCount, Usage};

fn simple(id: &str, name: &str, min: u16, max: u16, kind: ElementKind) -> Arc<ElementDef> {
    ElementDef::new(id, name, min, max, kind).expect("minimal catalog element is well-formed")
}

fn required(position: u16, definition: Arc<ElementDef>) -> ElementUse {
    ElementUse {
        position,
        definition: ElementUseDef::Element(definition),
        usage: Usage::Mandatory,
        repeat_count: RepeatCount::Bounded(1),
    }
}

fn optional(position: u16, definition: Arc<ElementDef>) -> ElementUse {
    ElementUse {
        position,
        definition: ElementUseDef::Element(definition),
        usage: Usage::Optional,
        repeat_count: RepeatCount::Bounded(1),
    }
}

fn isa_def() -> Arc<SegmentDef> {
    let an = |id: &str, name: &str, n: u16| simple(id, name, n, n, ElementKind::AlphaNumeric);
    SegmentDef::new(
        "ISA",
        "Interchange Control Header",
        "isa",
        vec![
            required(1, an("I01", "Authorization Information Qualifier", 2)),
            required(2, an("I02", "Authorization Information", 10)),
            required(3, an("I03", "Security Information Qualifier", 2)),
            required(4, an("I04", "Security Information", 10)),
            required(5, an("I05", "Interchange ID Qualifier", 2)),
            required(6, an("I06", "Interchange Sender ID", 15)),
            required(7, an("I05", "Interchange ID Qualifier", 2)),
            required(8, an("I07", "Interchange Receiver ID", 15)),
            required(9, simple("I08", "Interchange Date", 6, 6, ElementKind::Date)),
            required(10, simple("I09", "Interchange Time", 4, 4, ElementKind::Time)),
            required(11, an("I65", "Repetition Separator", 1)),
            required(12, an("I11", "Interchange Control Version Number", 5)),
            required(
                13,
                simple("I12", "Interchange Control Number", 9, 9, ElementKind::Numeric { precision: 0 }),
            ),
            required(14, an("I13", "Acknowledgment Requested", 1)),
            required(15, an("I14", "Usage Indicator", 1)),
            required(16, an("I15", "Component Element Separator", 1)),
        ],
    )
    .expect("ISA definition is dense")
}

fn iea_def() -> Arc<SegmentDef> {
    SegmentDef::new(
        "IEA",
        "Interchange Control Trailer",
        "iea",
        vec![
            required(
                1,
                simple("I16", "Number of Included Functional Groups", 1, 5, ElementKind::Numeric { precision: 0 }),
            ),
            required(
                2,
                simple("I12", "Interchange Control Number", 9, 9, ElementKind::Numeric { precision: 0 }),
            ),
        ],
    )
    .expect("IEA definition is dense")
}

fn gs_def() -> Arc<SegmentDef> {
    let an = |id: &str, name: &str, min: u16, max: u16| simple(id, name, min, max, ElementKind::AlphaNumeric);
    SegmentDef::new(
        "GS",
        "Functional Group Header",
        "gs",
        vec![
            required(1, an("479", "Functional Identifier Code", 2, 2)),
            required(2, an("142", "Application Sender's Code", 2, 15)),
            required(3, an("124", "Application Receiver's Code", 2, 15)),
            required(4, simple("373", "Date", 8, 8, ElementKind::Date)),
            required(5, simple("337", "Time", 4, 8, ElementKind::Time)),
            required(
                6,
                simple("28", "Group Control Number", 1, 9, ElementKind::Numeric { precision: 0 }),
            ),
            required(7, an("455", "Responsible Agency Code", 1, 2)),
            required(8, an("480", "Version / Release / Industry Identifier Code", 1, 12)),
        ],
    )
    .expect("GS definition is dense")
}

fn ge_def() -> Arc<SegmentDef> {
    SegmentDef::new(
        "GE",
        "Functional Group Trailer",
        "ge",
        vec![
            required(
                1,
                simple("97", "Number of Transaction Sets Included", 1, 6, ElementKind::Numeric { precision: 0 }),
            ),
            required(
                2,
                simple("28", "Group Control Number", 1, 9, ElementKind::Numeric { precision: 0 }),
            ),
        ],
    )
    .expect("GE definition is dense")
}

fn st_def() -> Arc<SegmentDef> {
    SegmentDef::new(
        "ST",
        "Transaction Set Header",
        "st",
        vec![
            required(1, simple("143", "Transaction Set Identifier Code", 3, 3, ElementKind::Identifier)),
            required(
                2,
                simple("329", "Transaction Set Control Number", 4, 9, ElementKind::Numeric { precision: 0 }),
            ),
        ],
    )
    .expect("ST definition is dense")
}

fn se_def() -> Arc<SegmentDef> {
    SegmentDef::new(
        "SE",
        "Transaction Set Trailer",
        "se",
        vec![
            required(
                1,
                simple("96", "Number of Included Segments", 1, 10, ElementKind::Numeric { precision: 0 }),
            ),
            required(
                2,
                simple("329", "Transaction Set Control Number", 4, 9, ElementKind::Numeric { precision: 0 }),
            ),
        ],
    )
    .expect("SE definition is dense")
}

fn bht_def() -> Arc<SegmentDef> {
    SegmentDef::new(
        "BHT",
        "Beginning of Hierarchical Transaction",
        "bht",
        vec![
            required(1, simple("1005", "Hierarchical Structure Code", 4, 4, ElementKind::Identifier)),
            required(2, simple("353", "Transaction Set Purpose Code", 2, 2, ElementKind::Identifier)),
            optional(
                3,
                simple("127", "Reference Identification", 1, 50, ElementKind::AlphaNumeric),
            ),
            optional(4, simple("373", "Date", 8, 8, ElementKind::Date)),
            optional(5, simple("337", "Time", 4, 8, ElementKind::Time)),
            optional(6, simple("640", "Transaction Type Code", 2, 2, ElementKind::Identifier)),
        ],
    )
    .expect("BHT definition is dense")
}

fn nm1_def() -> Arc<SegmentDef> {
    SegmentDef::new(
        "NM1",
        "Individual or Organizational Name",
        "nm1",
        vec![
            required(1, simple("98", "Entity Identifier Code", 2, 3, ElementKind::Identifier)),
            required(2, simple("1065", "Entity Type Qualifier", 1, 1, ElementKind::Identifier)),
            optional(
                3,
                simple("1035", "Name Last or Organization Name", 1, 60, ElementKind::AlphaNumeric),
            ),
            optional(4, simple("1036", "Name First", 1, 35, ElementKind::AlphaNumeric)),
            optional(5, simple("1037", "Name Middle", 1, 25, ElementKind::AlphaNumeric)),
            optional(6, simple("1038", "Name Prefix", 1, 10, ElementKind::AlphaNumeric)),
            optional(7, simple("1039", "Name Suffix", 1, 10, ElementKind::AlphaNumeric)),
            optional(8, simple("66", "Identification Code Qualifier", 1, 2, ElementKind::Identifier)),
            optional(
                9,
                simple("67", "Identification Code", 2, 80, ElementKind::AlphaNumeric),
            ),
        ],
    )
    .expect("NM1 definition is dense")
}

fn nm1_loop() -> ChildUse {
    let loop_def = crate::container::LoopDef::new(
        "2010",
        "Individual or Organizational Name Loop",
        vec![ChildUse {
            position: 1,
            child: ChildDef::Segment(nm1_def()),
            usage: Usage::Mandatory,
            repeat_count: RepeatCount::Bounded(1),
        }],
    )
    .expect("NM1 loop is dense");
    ChildUse {
        position: 2,
        child: ChildDef::Loop(loop_def),
        usage: Usage::Optional,
        repeat_count: RepeatCount::Unbounded,
    }
}

fn health_care_claim_837() -> Arc<TransactionSetDef> {
    TransactionSetDef::new(
        "837",
        "Health Care Claim",
        st_def(),
        se_def(),
        vec![
            ChildUse {
                position: 1,
                child: ChildDef::Segment(bht_def()),
                usage: Usage::Mandatory,
                repeat_count: RepeatCount::Bounded(1),
            },
            nm1_loop(),
        ],
    )
    .expect("837 transaction set is dense")
}

fn functional_group(id: &str, name: &str, transaction_sets: Vec<Arc<TransactionSetDef>>) -> Arc<FunctionalGroupDef> {
    let children = transaction_sets
        .into_iter()
        .enumerate()
        .map(|(i, ts)| ChildUse {
            position: (i + 1) as u16,
            child: ChildDef::TransactionSet(ts),
            usage: Usage::Mandatory,
            repeat_count: RepeatCount::Unbounded,
        })
        .collect();
    FunctionalGroupDef::new(id, name, gs_def(), ge_def(), children)
        .expect("functional group is dense")
}

/// Builds the `"005010"` illustrative catalog: ISA/IEA, GS/GE, ST/SE, a
/// `BHT` + `NM1` loop inside an `837`, registered under functional
/// identifier code `"HC"`.
pub fn static_005010_catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    let version = "005010";

    let claim_837 = health_care_claim_837();
    let hc_group = functional_group("HC", "Health Care Claim Group", vec![claim_837.clone()]);

    let mut dict = SegmentDict::new(version);
    for def in [
        isa_def(),
        iea_def(),
        gs_def(),
        ge_def(),
        st_def(),
        se_def(),
        bht_def(),
        nm1_def(),
    ] {
        dict.insert(def).expect("minimal catalog has no duplicate tags");
    }
    let dict = Arc::new(dict);

    let interchange = InterchangeDef::new(
        version,
        isa_def(),
        iea_def(),
        vec![ChildUse {
            position: 1,
            child: ChildDef::FunctionalGroup(hc_group.clone()),
            usage: Usage::Mandatory,
            repeat_count: RepeatCount::Unbounded,
        }],
        dict,
    )
    .expect("interchange definition is dense");

    catalog.register_interchange(interchange);
    catalog.register_functional_group(version, hc_group);
    catalog.register_transaction_set(version, claim_837);
    catalog
}
