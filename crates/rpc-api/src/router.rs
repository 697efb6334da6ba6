//! App Router

use salvo::prelude::*;

use crate::{
    healthcheck, interceptors,
    jobs::{
        self,
        descriptor::{METHODS, MethodDescriptor, SERVICE},
    },
    rpc::RpcStatus,
};

#[handler]
async fn unknown_method(req: &mut Request, res: &mut Response) {
    RpcStatus::not_found(format!("unknown method: {}", req.uri().path())).render(res);
}

fn method_route(descriptor: &MethodDescriptor) -> Router {
    let route = Router::with_path(descriptor.name());

    match descriptor.name() {
        "CreateJob" => route.post(jobs::create::handler),
        "GetJob" => route.post(jobs::get::handler),
        "GetJobs" => route.post(jobs::list::handler),
        "DeleteJob" => route.post(jobs::delete::handler),
        _ => route.post(unknown_method),
    }
}

/// Health probes plus every `jobs.v1.Jobs` method behind the auth interceptors.
pub fn app_router() -> Router {
    let service = METHODS.iter().fold(
        Router::with_path(SERVICE)
            .hoop(interceptors::authenticate)
            .hoop(interceptors::authorize),
        |service, descriptor| service.push(method_route(descriptor)),
    );

    Router::new()
        .push(
            Router::with_path("health")
                .push(Router::with_path("live").get(healthcheck::live))
                .push(Router::with_path("ready").get(healthcheck::ready)),
        )
        .push(service.push(Router::with_path("{**rest}").post(unknown_method)))
}
