use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use logichr::analysis;
use logichr::{
    AnalysisContext, AnalysisOptions, AnalysisReport, OvernightPolicy, RawInputs, ShiftCostRow,
};

#[derive(Parser)]
#[command(name = "logichr", about = "Department cost and performance analysis for HR data")]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Directory containing employees, attendance and performance as .csv or .xlsx
    #[arg(long, value_name = "DIR", conflicts_with_all = ["employees", "attendance", "performance"])]
    data_dir: Option<PathBuf>,
    /// Employee roster (.csv, .xlsx or .xls)
    #[arg(long, value_name = "FILE")]
    employees: Option<PathBuf>,
    /// Attendance punches (.csv, .xlsx or .xls)
    #[arg(long, value_name = "FILE")]
    attendance: Option<PathBuf>,
    /// Performance targets (.csv, .xlsx or .xls)
    #[arg(long, value_name = "FILE")]
    performance: Option<PathBuf>,
}

impl InputArgs {
    fn read(&self) -> anyhow::Result<RawInputs> {
        if let Some(dir) = &self.data_dir {
            return Ok(RawInputs::from_dir(dir)?);
        }
        match (&self.employees, &self.attendance, &self.performance) {
            (Some(e), Some(a), Some(p)) => Ok(RawInputs::from_paths(e, a, p)?),
            _ => anyhow::bail!(
                "pass --data-dir, or all of --employees, --attendance and --performance"
            ),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Average daily hours above which a department/weekday is flagged
        #[arg(long, default_value_t = logichr::config::DEFAULT_OVERLOAD_THRESHOLD)]
        overload_threshold: f64,
        /// Number of employees in the hours ranking
        #[arg(long, default_value_t = logichr::config::DEFAULT_RANKING_LIMIT)]
        top: u32,
        /// Fail when attendance references unknown employees
        #[arg(long)]
        strict: bool,
        /// Check-out before check-in on the same date
        #[arg(long, value_enum, default_value_t = OvernightPolicy::Reject)]
        overnight: OvernightPolicy,
        /// Only use performance targets for this evaluation period
        #[arg(long, value_name = "LABEL")]
        period: Option<String>,
        /// Output as JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,
        /// Write each table as CSV into this directory
        #[arg(long, value_name = "DIR")]
        csv: Option<PathBuf>,
        /// Print the department analysis SQL
        #[arg(long)]
        show_sql: bool,
        /// Include the per-record cost table (printed, in JSON, or as shift_costs.csv)
        #[arg(long)]
        costs: bool,
    },
    /// Check that the input files carry the required columns
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the SQL used by the analysis
    Query {
        /// Print every query, not only the department analysis
        #[arg(long)]
        all: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            overload_threshold,
            top,
            strict,
            overnight,
            period,
            json,
            csv,
            show_sql,
            costs,
        } => {
            let mut options = AnalysisOptions::new()
                .overload_threshold(overload_threshold)
                .ranking_limit(top)
                .overnight(overnight);
            if strict {
                options = options.strict();
            }
            if let Some(p) = period.as_deref() {
                options = options.evaluation_period(p);
            }
            if costs {
                options = options.with_shift_costs();
            }

            let ctx = AnalysisContext::from_raw(input.read()?, options)?;
            let report = ctx.run()?;

            if let Some(dir) = csv {
                for path in report.write_csv_dir(&dir)? {
                    println!("Wrote {}", path.display());
                }
            } else if json {
                println!("{}", report.to_json()?);
            } else {
                print_report(&report);
                if let Some(rows) = &report.shift_costs {
                    print_costs(rows);
                }
            }
            if show_sql && !json {
                println!("\nDepartment analysis SQL:\n{}", report.department_analysis_sql);
            }
        }
        Commands::Validate { input } => {
            let raw = input.read()?;
            raw.validate()?;
            println!(
                "OK: {} employees, {} attendance, {} performance rows",
                raw.employees.records.len(),
                raw.attendance.records.len(),
                raw.performance.records.len()
            );
        }
        Commands::Query { all } => {
            if all {
                println!("-- shift costs\n{};\n", analysis::SHIFT_COST_SQL);
                println!("-- department analysis\n{};\n", analysis::DEPARTMENT_ANALYSIS_SQL);
                println!("-- employee ranking\n{};\n", analysis::EMPLOYEE_RANKING_SQL);
                println!("-- work patterns\n{};", analysis::WORK_PATTERN_SQL);
            } else {
                println!("{};", analysis::DEPARTMENT_ANALYSIS_SQL);
            }
        }
    }

    Ok(())
}

#[derive(Tabled)]
struct DepartmentLine {
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Headcount")]
    headcount: u64,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Labor cost")]
    cost: String,
    #[tabled(rename = "Achievement")]
    achievement: String,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
}

#[derive(Tabled)]
struct RankingLine {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

#[derive(Tabled)]
struct PatternLine {
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Avg hours")]
    avg_hours: String,
    #[tabled(rename = "Records")]
    records: u64,
    #[tabled(rename = "Overload")]
    overload: String,
}

#[derive(Tabled)]
struct CostLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Cost")]
    cost: String,
}

fn print_report(report: &AnalysisReport) {
    let s = &report.summary;
    println!("Summary");
    println!("  Total labor cost:  {}", group_thousands(s.total_labor_cost));
    println!("  Total hours:       {}", group_thousands(s.total_hours));
    match s.avg_target_achievement_rate {
        Some(rate) => println!("  Avg achievement:   {:.1}%", rate * 100.0),
        None => println!("  Avg achievement:   n/a"),
    }
    if let (Some(name), Some(idx)) = (&s.best_department, s.best_efficiency_index) {
        println!("  Most efficient:    {name} ({idx:.2})");
    }
    println!(
        "  Rows processed:    {} ({} ms)",
        group_thousands(s.rows_processed as i64),
        s.elapsed_ms
    );

    println!("\nDepartments");
    if report.departments.is_empty() {
        println!("  No department has both attendance data and a performance target.");
    } else {
        let rows: Vec<DepartmentLine> = report
            .departments
            .iter()
            .map(|d| DepartmentLine {
                department: d.department.clone(),
                headcount: d.active_headcount,
                hours: group_thousands(d.total_hours),
                cost: group_thousands(d.total_labor_cost),
                achievement: format!("{:.1}%", d.target_achievement_rate * 100.0),
                efficiency: d
                    .efficiency_index
                    .map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}")),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        println!("{table}");
    }

    println!("\nTop employees by hours");
    let rows: Vec<RankingLine> = report
        .employee_ranking
        .iter()
        .enumerate()
        .map(|(i, r)| RankingLine {
            rank: i + 1,
            name: r.name.clone(),
            department: r.department.clone(),
            level: r.level.clone(),
            hours: format!("{:.1}", r.total_hours),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");

    println!("\nWork patterns");
    let rows: Vec<PatternLine> = report
        .work_patterns
        .iter()
        .map(|p| PatternLine {
            department: p.department.clone(),
            day: p.day_of_week.clone(),
            avg_hours: format!("{:.2}", p.avg_hours),
            records: p.record_count,
            overload: if p.overload_risk { "RISK".into() } else { String::new() },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");

    let misses = &report.diagnostics.join_misses;
    let load = &report.diagnostics.load;
    let excluded = load.missing_punch + load.malformed_intervals + misses.orphan_attendance;
    if excluded > 0 || report.diagnostics.rejected.total() > 0 {
        println!(
            "\nExcluded: {} missing punch, {} malformed, {} unknown employee, {} unparseable",
            load.missing_punch,
            load.malformed_intervals,
            misses.orphan_attendance,
            report.diagnostics.rejected.total()
        );
    }
}

fn print_costs(costs: &[ShiftCostRow]) {
    let rows: Vec<CostLine> = costs
        .iter()
        .map(|c| CostLine {
            date: c.date.clone(),
            name: c.name.clone(),
            department: c.department.clone(),
            hours: format!("{:.2}", c.hours_worked),
            cost: group_thousands(c.daily_cost as i64),
        })
        .collect();
    println!("\nShift costs");
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}
