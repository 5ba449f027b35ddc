//! Benchmarks for the typescope pipeline.
//!
//! Run with: `cargo bench`
//!
//! Measures parsing + lowering and the report walk separately, over synthetic
//! classes of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use typescope::domain::report::TypeReporter;
use typescope::infrastructure::TreeSitterJavaParser;
use typescope::ports::SourceParser;

// ═══════════════════════════════════════════════════════════════════════════
// Synthetic Data Generators
// ═══════════════════════════════════════════════════════════════════════════

/// A class with `members` fields and as many methods, each method declaring locals.
fn synthetic_class(members: usize) -> String {
    let mut src = String::from("package bench;\n\nimport java.util.List;\nimport java.util.*;\n\n");
    src.push_str("public class Generated<T extends Comparable<T>> {\n");
    for i in 0..members {
        src.push_str(&format!("    private List<String> field{i} = new ArrayList<>();\n"));
        src.push_str(&format!("    public Map<String, T> method{i}(int a, String b, T... rest) {{\n"));
        src.push_str("        Map<String, T> out = new HashMap<>();\n");
        src.push_str("        for (T item : rest) { out.put(b, item); }\n");
        src.push_str("        return out;\n");
        src.push_str("    }\n");
    }
    src.push_str("}\n");
    src
}

// ═══════════════════════════════════════════════════════════════════════════
// Benchmarks
// ═══════════════════════════════════════════════════════════════════════════

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("typescope/parse");
    let parser = TreeSitterJavaParser::new();

    for members in [10, 100, 500].iter() {
        let src = synthetic_class(*members);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), &src, |b, src| {
            b.iter(|| parser.parse(black_box(src)).unwrap());
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("typescope/report");
    let parser = TreeSitterJavaParser::new();

    for members in [10, 100, 500].iter() {
        let tree = parser.parse(&synthetic_class(*members)).unwrap();
        group.throughput(Throughput::Elements(tree.node_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), &tree, |b, tree| {
            b.iter(|| TypeReporter::report(black_box(tree)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_report);
criterion_main!(benches);
