//! Tests for the kernel catalogue: lookup, metadata, checked calls and
//! serialisation.

use crate::aligned::{max_alignment, AlignedBuffer};
use crate::catalogue::{self, OPERATION_NAMES};
use crate::error::Error;
use crate::isa::{cpu_features, CpuFeatures, Isa};
use crate::types::{Alignment, Complex32, ElementType};

// =============================================================================
// Metadata
// =============================================================================

#[test]
fn test_every_operation_is_listed_once() {
    let ops = catalogue::operations();
    let names: Vec<_> = ops.iter().map(|op| op.name).collect();
    assert_eq!(names, OPERATION_NAMES);
}

#[test]
fn test_generic_variant_comes_first_and_has_no_tail() {
    for op in catalogue::operations() {
        let first = op.variants[0];
        assert_eq!(first.name, "generic", "{}", op.name);
        assert_eq!(first.isa, Isa::Generic);
        assert_eq!(first.alignment, Alignment::Unaligned);
        assert_eq!(first.alignment_bytes, 1);
        assert_eq!(first.tail, None);
        assert!(!first.alternate);
    }
}

#[test]
fn test_variant_names_follow_alignment_and_isa() {
    for op in catalogue::operations() {
        for v in op.variants.iter().filter(|v| v.isa != Isa::Generic && v.isa != Isa::Neon) {
            let expected = format!("{}_{}", v.alignment.tag(), v.isa.name());
            if v.alternate {
                assert!(v.name.starts_with(&format!("{expected}_variant_")), "{}: {}", op.name, v.name);
            } else {
                assert_eq!(v.name, expected, "{}", op.name);
            }
            match v.alignment {
                Alignment::Aligned => assert_eq!(v.alignment_bytes, v.isa.register_bytes()),
                Alignment::Unaligned => assert_eq!(v.alignment_bytes, 1),
            }
        }
    }
}

#[test]
fn test_every_tail_names_an_existing_narrower_variant() {
    for op in catalogue::operations() {
        for v in &op.variants {
            let Some(tail) = v.tail else { continue };
            let target = op
                .variants
                .iter()
                .find(|t| t.name == tail)
                .unwrap_or_else(|| panic!("{}: {} tails into missing {tail}", op.name, v.name));
            assert!(target.isa < v.isa, "{}: {} -> {}", op.name, v.name, tail);
            assert_eq!(target.alignment, Alignment::Unaligned);
            assert!(target.width < v.width || target.isa == Isa::Generic);
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_avx_tanh_tails_into_unaligned_sse() {
    let table = catalogue::tanh_32f();
    for name in ["u_avx", "a_avx", "u_avx_fma", "a_avx_fma"] {
        let variant = table.variant(name).expect("variant exists");
        assert_eq!(table.tail_of(variant).map(|t| t.name()), Some("u_sse"));
    }
    let sse = table.variant("u_sse").expect("variant exists");
    assert_eq!(table.tail_of(sse).map(|t| t.name()), Some("generic"));
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_x86_variant_sets() {
    let names = |op: &str| -> Vec<&'static str> {
        catalogue::operation(op)
            .expect("operation exists")
            .variants
            .iter()
            .map(|v| v.name)
            .collect()
    };
    assert_eq!(
        names("tanh_32f"),
        ["generic", "u_sse", "a_sse", "u_avx", "a_avx", "u_avx_fma", "a_avx_fma"]
    );
    assert_eq!(
        names("multiply_conjugate_8ic_16ic"),
        ["generic", "u_sse4_1", "a_sse4_1", "u_avx2", "a_avx2"]
    );
    assert_eq!(
        names("binary_slicer_32f_32i"),
        ["generic", "generic_branchless", "u_sse2", "a_sse2", "u_avx", "a_avx"]
    );
    assert_eq!(
        names("deinterleave_real_8ic_32f"),
        ["generic", "u_sse", "a_sse", "u_sse4_1", "a_sse4_1", "u_avx2", "a_avx2"]
    );
    assert_eq!(names("divide_32fc"), ["generic", "u_sse3", "a_sse3", "u_avx", "a_avx"]);
    assert_eq!(
        names("index_min_32fc_16u"),
        [
            "generic",
            "u_sse3",
            "a_sse3",
            "u_avx2_variant_1",
            "a_avx2_variant_1",
            "u_avx2",
            "a_avx2"
        ]
    );
    assert_eq!(
        names("dot_prod_16i_32fc"),
        ["generic", "u_sse", "a_sse", "u_avx2", "a_avx2", "u_avx2_fma", "a_avx2_fma"]
    );
}

#[cfg(target_arch = "aarch64")]
#[test]
fn test_aarch64_variant_sets() {
    for op in catalogue::operations() {
        let names: Vec<_> = op.variants.iter().map(|v| v.name).collect();
        if op.name == "binary_slicer_32f_32i" {
            assert_eq!(names, ["generic", "generic_branchless", "neon"]);
        } else {
            assert_eq!(names, ["generic", "neon"], "{}", op.name);
        }
    }
}

#[test]
fn test_element_types() {
    let op = catalogue::operation("multiply_conjugate_8ic_16ic").expect("operation exists");
    assert_eq!(op.inputs, [ElementType::Complex8, ElementType::Complex8]);
    assert_eq!(op.output, ElementType::Complex16);

    let op = catalogue::operation("index_min_32fc_16u").expect("operation exists");
    assert_eq!(op.inputs, [ElementType::Complex32]);
    assert_eq!(op.output, ElementType::U16);
}

// =============================================================================
// Lookup and selection
// =============================================================================

#[test]
fn test_unknown_operation() {
    let err = catalogue::operation("tanh_64f").unwrap_err();
    assert!(matches!(err, Error::UnknownOperation(ref name) if name == "tanh_64f"));
}

#[test]
fn test_unknown_variant() {
    let err = catalogue::divide_32fc().variant("a_avx512").unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownVariant { operation: "divide_32fc", ref variant } if variant == "a_avx512"
    ));
}

#[test]
fn test_variants_carry_their_operation_name() {
    for variant in catalogue::index_min_32fc_16u() {
        assert_eq!(variant.operation(), "index_min_32fc_16u");
    }
    let generic = catalogue::dot_prod_16i_32fc().variant("generic").expect("generic");
    assert!(format!("{generic:?}").contains("dot_prod_16i_32fc"));
}

#[test]
fn test_best_with_generic_only_features() {
    let generic = CpuFeatures::only(&[]);
    let table = catalogue::tanh_32f();
    assert_eq!(table.best(generic, Alignment::Aligned).name(), "generic");
    assert_eq!(table.best(generic, Alignment::Unaligned).name(), "generic");
    assert_eq!(table.supported(generic).count(), 1);
}

#[test]
fn test_best_never_picks_an_alternate() {
    let generic = CpuFeatures::only(&[]);
    let slicer = catalogue::binary_slicer_32f_32i();
    let branchless = slicer.variant("generic_branchless").expect("variant exists");
    assert!(branchless.info().alternate);
    assert!(branchless.is_supported(generic));
    assert_eq!(slicer.best(generic, Alignment::Unaligned).name(), "generic");

    let index_min = catalogue::index_min_32fc_16u();
    for alignment in [Alignment::Aligned, Alignment::Unaligned] {
        assert!(!index_min.best(cpu_features(), alignment).info().alternate);
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_sse_deinterleave_serves_cpus_without_sse4_1() {
    let sse2_only = CpuFeatures::only(&[Isa::Sse, Isa::Sse2, Isa::Sse3]);
    let table = catalogue::deinterleave_real_8ic_32f();
    assert_eq!(table.best(sse2_only, Alignment::Aligned).name(), "a_sse");
    assert_eq!(table.best(sse2_only, Alignment::Unaligned).name(), "u_sse");
}

#[test]
fn test_best_respects_alignment_class() {
    let features = cpu_features();
    let table = catalogue::binary_slicer_32f_32i();
    let unaligned = table.best(features, Alignment::Unaligned);
    assert_eq!(unaligned.info().alignment, Alignment::Unaligned);
    assert!(unaligned.is_supported(features));

    let aligned = table.best(features, Alignment::Aligned);
    assert!(aligned.is_supported(features));
    assert!(aligned.info().isa >= unaligned.info().isa);
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_best_prefers_the_widest_supported_isa() {
    let sse_only = CpuFeatures::only(&[Isa::Sse, Isa::Sse2, Isa::Sse3, Isa::Sse41]);
    let table = catalogue::dot_prod_16i_32fc();
    assert_eq!(table.best(sse_only, Alignment::Aligned).name(), "a_sse");
    assert_eq!(table.best(sse_only, Alignment::Unaligned).name(), "u_sse");

    let mut avx2 = sse_only;
    avx2.insert(Isa::Avx2);
    assert_eq!(table.best(avx2, Alignment::Aligned).name(), "a_avx2");

    avx2.insert(Isa::Avx2Fma);
    assert_eq!(table.best(avx2, Alignment::Unaligned).name(), "u_avx2_fma");
}

// =============================================================================
// Checked calls
// =============================================================================

#[test]
fn test_call_rejects_length_mismatch() {
    let generic = catalogue::tanh_32f().variant("generic").expect("generic");
    let mut out = [0.0_f32; 3];
    let err = generic.call(&mut out, &[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch { operation: "tanh_32f", expected: 3, actual: 2 }
    ));
}

#[test]
fn test_dot_prod_call_checks_taps_length() {
    let generic = catalogue::dot_prod_16i_32fc().variant("generic").expect("generic");
    let mut out = Complex32::default();
    let err = generic.call(&mut out, &[1, 2, 3], &[Complex32::default(); 2]).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 3, actual: 2, .. }));
}

#[test]
fn test_aligned_variant_rejects_misaligned_buffers() {
    let features = cpu_features();
    let table = catalogue::tanh_32f();
    let Some(aligned) = table
        .supported(features)
        .find(|v| v.info().alignment == Alignment::Aligned)
    else {
        return;
    };
    let input = AlignedBuffer::<f32>::zeroed(17, max_alignment()).expect("alloc");
    let mut out = AlignedBuffer::<f32>::zeroed(17, max_alignment()).expect("alloc");

    aligned.call(&mut out[..16], &input[..16]).expect("aligned buffers accepted");

    let err = aligned.call(&mut out[1..], &input[1..]).unwrap_err();
    assert!(matches!(
        err,
        Error::Misaligned { operation: "tanh_32f", required, .. } if required == aligned.info().alignment_bytes
    ));
}

#[test]
fn test_unsupported_isa_is_rejected() {
    let features = cpu_features();
    let table = catalogue::divide_32fc();
    let Some(unsupported) = table.iter().find(|v| !v.is_supported(features)) else {
        return;
    };
    let mut out = [Complex32::default(); 4];
    let a = [Complex32::new(1.0, 1.0); 4];
    let err = unsupported.call(&mut out, &a, &a).unwrap_err();
    assert!(matches!(err, Error::UnsupportedIsa { operation: "divide_32fc", .. }));
}

#[test]
fn test_empty_buffers_are_accepted_by_aligned_variants() {
    let features = cpu_features();
    for variant in catalogue::binary_slicer_32f_32i().supported(features) {
        let mut out: [i32; 0] = [];
        variant.call(&mut out, &[]).expect("empty call");
    }
}

// =============================================================================
// Serialisation
// =============================================================================

#[test]
fn test_json_export() {
    let json = catalogue::to_json().expect("serialise");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    let ops = value.as_array().expect("array of operations");
    assert_eq!(ops.len(), OPERATION_NAMES.len());

    let tanh = &ops[0];
    assert_eq!(tanh["name"], "tanh_32f");
    assert_eq!(tanh["inputs"][0], "f32");
    assert_eq!(tanh["output"], "f32");
    let generic = &tanh["variants"][0];
    assert_eq!(generic["name"], "generic");
    assert_eq!(generic["isa"], "generic");
    assert_eq!(generic["alignment"], "unaligned");
    assert_eq!(generic["width"], 1);
    assert!(generic["tail"].is_null());
    assert_eq!(generic["alternate"], false);

    let deinterleave = &ops[3];
    assert_eq!(deinterleave["inputs"][1], "scalar_f32");
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_json_uses_sse4_1_tag() {
    let json = catalogue::to_json().expect("serialise");
    assert!(json.contains("\"sse4_1\""));
    assert!(json.contains("\"a_sse4_1\""));
}
