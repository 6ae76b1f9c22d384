use omnibus::{
    catalog::Catalog,
    handler::QueryHandler,
    model::{BaseDocument, BaseRequest, StatDocument},
    persist,
    render::MapRenderer,
    routing::{RoutingSettings, TransportRouter},
};
use std::{
    env,
    error::Error,
    io::{self, Read, Write},
    process::ExitCode,
    time::Instant,
};
use tracing::{error, info};

fn print_usage() {
    eprintln!("Usage: omnibus [make_base|process_requests]");
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the reply document.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let mut args = env::args().skip(1);
    let (Some(mode), None) = (args.next(), args.next()) else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let result = match mode.as_str() {
        "make_base" => make_base(),
        "process_requests" => process_requests(),
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = result {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn read_stdin() -> Result<String, io::Error> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn make_base() -> Result<(), Box<dyn Error>> {
    let input = read_stdin()?;
    let document: BaseDocument = serde_json::from_str(&input)?;

    let now = Instant::now();
    let mut stop_specs = Vec::new();
    let mut bus_specs = Vec::new();
    for request in document.base_requests {
        match request {
            BaseRequest::Stop(stop) => stop_specs.push(stop.into()),
            BaseRequest::Bus(bus) => bus_specs.push(bus.into()),
        }
    }

    let catalog = Catalog::build(stop_specs, bus_specs)?;
    let renderer = MapRenderer::new(document.render_settings.into(), &catalog);
    let settings = RoutingSettings::new(
        document.routing_settings.bus_wait_time,
        document.routing_settings.bus_velocity,
    )?;
    let router = TransportRouter::build(settings, &catalog);
    persist::save(
        &document.serialization_settings.file,
        &catalog,
        &renderer,
        &router,
    )?;
    info!("Building the query model took {:?}", now.elapsed());
    Ok(())
}

fn process_requests() -> Result<(), Box<dyn Error>> {
    let input = read_stdin()?;
    let document: StatDocument = serde_json::from_str(&input)?;

    let artifact = persist::load(&document.serialization_settings.file)?;
    let handler = QueryHandler::new(&artifact.catalog, &artifact.renderer, &artifact.router);
    let responses = handler.process(&document.stat_requests);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &responses)?;
    writeln!(out)?;
    Ok(())
}
