//! Benchmarks for build planning and toolchain discovery.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use srclib::config::{SearchPath, Tree};
use srclib::ops::builtin_registry;
use srclib::plan::{create_makefile, Options};
use srclib::testkit::{MemoryFileSystem, StaticToolChooser};
use srclib::toolchain::Toolchains;
use srclib::{SourceUnit, ToolRef};
use std::hint::black_box;

fn create_tree(units: usize, files_per_unit: usize) -> Tree {
    Tree::new(
        (0..units)
            .map(|i| {
                SourceUnit::new(format!("github.com/example/pkg{}", i), "GoPackage")
                    .with_files((0..files_per_unit).map(|f| format!("pkg{}/file{}.go", i, f)))
            })
            .collect(),
    )
}

fn bench_create_makefile(c: &mut Criterion) {
    let registry = builtin_registry().expect("builtin registry");
    let tools = StaticToolChooser::new()
        .with_tool("graph", "GoPackage", ToolRef::new("sourcegraph.com/sourcegraph/srclib-go", "graph"))
        .with_tool("depresolve", "GoPackage", ToolRef::new("sourcegraph.com/sourcegraph/srclib-go", "depresolve"));
    let options = Options {
        no_cache: false,
        toolchain_exec_opt: "--methods program,docker".to_string(),
    };

    let mut group = c.benchmark_group("create_makefile");
    for size in [10, 100, 1000].iter() {
        let tree = create_tree(*size, 20);
        group.bench_with_input(BenchmarkId::new("units", size), size, |b, _| {
            b.iter(|| {
                let mf = create_makefile(&registry, ".srclib-cache/abc", &tree, &options, &tools)
                    .expect("plan");
                black_box(mf.marshal());
            })
        });
    }
    group.finish();
}

fn bench_list_toolchains(c: &mut Criterion) {
    let mut fs = MemoryFileSystem::new();
    for i in 0..50 {
        fs = fs
            .with_file(format!("/srclib/example.com/org{}/tc{}/Srclibtoolchain", i % 5, i), "")
            .with_file(format!("/srclib/example.com/org{}/tc{}/src/main.go", i % 5, i), "");
    }
    let toolchains = Toolchains::new(SearchPath::from_dirs(["/srclib"])).with_fs(fs);

    c.bench_function("list_toolchains_50", |b| {
        b.iter(|| black_box(toolchains.list().expect("list")))
    });
}

criterion_group!(benches, bench_create_makefile, bench_list_toolchains);
criterion_main!(benches);
