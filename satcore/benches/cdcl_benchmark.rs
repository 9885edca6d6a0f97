use criterion::{criterion_group, criterion_main, Criterion};

use satcore::config::SolverConfig;
use satcore::lit::Lit;
use satcore::solver::Solver;
use satcore::CnfFormula;

/// The classic "n+1 pigeons into n holes" unsatisfiable family: exercises the
/// conflict-driven learning loop since no decision order avoids backtracking.
fn pigeonhole(pigeons: usize) -> CnfFormula {
    let holes = pigeons - 1;
    let var = |p: usize, h: usize| -> isize { (p * holes + h + 1) as isize };

    let mut clauses: Vec<Vec<Lit>> = Vec::new();
    for p in 0..pigeons {
        clauses.push((0..holes).map(|h| Lit::from_dimacs(var(p, h))).collect());
    }
    for h in 0..holes {
        for p1 in 0..pigeons {
            for p2 in (p1 + 1)..pigeons {
                clauses.push(vec![
                    Lit::from_dimacs(-var(p1, h)),
                    Lit::from_dimacs(-var(p2, h)),
                ]);
            }
        }
    }
    CnfFormula::from(clauses)
}

fn bench_pigeonhole(c: &mut Criterion) {
    let mut group = c.benchmark_group("pigeonhole");
    group.sample_size(10);
    group.measurement_time(std::time::Duration::from_secs(5));

    for pigeons in [6usize, 7, 8] {
        let formula = pigeonhole(pigeons);
        group.bench_function(format!("{}-into-{}", pigeons, pigeons - 1), |b| {
            b.iter(|| {
                let solver = Solver::new(SolverConfig::default());
                solver.solve(&formula)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pigeonhole);
criterion_main!(benches);
