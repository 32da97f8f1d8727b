//! Round-trip coverage for method descriptors and generic method
//! signatures, including shapes mined from real class files.

use sigscope_model::MethodSignature;
use sigscope_parse::parse_method_signature;

fn round_trip(text: &str) -> MethodSignature {
    let parsed = parse_method_signature(text).unwrap_or_else(|e| panic!("{text}: {e}"));
    assert_eq!(text, parsed.to_string(), "round trip mismatch");
    parsed
}

#[test]
fn plain_descriptors() {
    round_trip("()V");
    round_trip("()Z");
    round_trip("(I)V");
    round_trip("(Ljava/lang/String;)V");
    round_trip("([[[S)V");
    round_trip("()[C");
    round_trip("([B[S[I[J[F[D[Z[C[Ljava/lang/Object;)[Ljava/lang/Object;");
}

#[test]
fn declared_parameter_with_bound() {
    let parsed =
        round_trip("<T:Ljava/lang/Object;>(Ljava/util/Collection<TT;>;Ljava/util/Collection<TT;>;)Z");
    assert_eq!(vec!["T"], parsed.type_parameters().keys().collect::<Vec<_>>());
    assert_eq!(2, parsed.arguments().len());
    assert_eq!("Z", parsed.return_type().internal_name());
}

#[test]
fn interface_marked_bounds() {
    round_trip("<K:Lcom/x/Key;:Ljava/lang/CharSequence;V:Ljava/lang/Number;M::Ljava/util/Map<-TK;+TV;>;>(Ljava/util/List<+TK;>;Ljava/util/List<+TV;>;TM;)TM;");
}

#[test]
fn multiple_declared_parameters() {
    let parsed = round_trip(
        "<K::Ljava/lang/Iterable<TS;>;X:TK;>(Lcom/x/Triple<+TX;-TK;-Ljava/lang/CharSequence;>;)Lcom/x/Triple<TX;Ljava/lang/CharSequence;TK;>;",
    );
    assert_eq!(
        vec!["K", "X"],
        parsed.type_parameters().keys().collect::<Vec<_>>()
    );
}

#[test]
fn generic_array_return() {
    round_trip("<T:Ljava/lang/Object;>(Ljava/lang/Class<TT;>;)[TT;");
}

#[test]
fn generic_map_return() {
    round_trip("()Ljava/util/Map<Ljava/lang/String;Ljava/lang/Integer;>;");
    round_trip("()Ljava/util/Map<[B[[S>;");
}

#[test]
fn inner_class_argument_with_outer_generics() {
    // SmallSortedMap<K, V>.Entry as an argument type
    round_trip("(Lcom/google/protobuf/SmallSortedMap<TK;TV;>.Entry;)I");
}

#[test]
fn return_type_some_reference_readers_reject() {
    // The inner-class chain continues past a semicolon; the remainder is
    // kept verbatim and reproduced on rendering.
    let parsed = round_trip("()Lorg/apache/curator/shaded/com/google/common/collect/AbstractMapBasedMultimap<TK;TV;>.SortedAsMap;Ljava/util/NavigableMap<TK;Ljava/util/Collection<TV;>;>;");
    assert!(parsed.arguments().is_empty());
}

#[test]
fn to_code_renders_something_readable() {
    let parsed = round_trip("(Ljava/lang/String;I)Z");
    assert_eq!("boolean (java.lang.String a, int b)", parsed.to_code());
}

#[test]
fn malformed_method_signatures_error_out() {
    assert!(parse_method_signature("").is_err());
    assert!(parse_method_signature("<<<<").is_err());
    assert!(parse_method_signature("()").is_err());
}
