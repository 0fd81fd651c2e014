use crate::{AppConfig, CliError};
use mga_core::models::{
    ConstraintSet, Dimension, Direction, DirectionParseError, FeasibleRegion, Point,
};
use mga_explorer::{PathCache, Phase, Selection, Session};
use mga_solver::clarabel::ClarabelOracle;
use serde::Serialize;
use std::{str::FromStr, sync::Arc};
use thiserror::Error;
use tracing::{Level, event, span};

/// One scripted step, written `DIRECTION` or `DIRECTION=VALUE`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepArg {
    pub direction: Direction,
    pub value: Option<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum StepArgError {
    #[error(transparent)]
    Direction(#[from] DirectionParseError),
    #[error("{0:?} is not a number")]
    Value(String),
}

impl FromStr for StepArg {
    type Err = StepArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "=" alone spells hold, so only a trailing "=VALUE" is split off.
        if let Ok(direction) = s.parse() {
            return Ok(Self {
                direction,
                value: None,
            });
        }
        let (direction, value) = s
            .rsplit_once('=')
            .ok_or_else(|| DirectionParseError(s.trim().to_owned()))?;
        let value = value
            .trim()
            .parse()
            .map_err(|_| StepArgError::Value(value.to_owned()))?;
        Ok(Self {
            direction: direction.parse()?,
            value: Some(value),
        })
    }
}

#[derive(Serialize)]
pub struct StepReport {
    pub dimension: Dimension,
    pub direction: Direction,
    pub value: Option<f64>,
    pub extreme: Point,
    pub anchor: Point,
    pub message: String,
}

#[derive(Serialize)]
pub struct WalkReport {
    pub order: Vec<Dimension>,
    pub steps: Vec<StepReport>,
    /// Why the walk ended before its last scripted step, if it did
    pub stopped: Option<String>,
    pub phase: Phase,
    pub constraints: ConstraintSet,
    pub selections: Vec<Selection>,
}

/// Play the scripted steps through a session, stopping at the first step
/// the region cannot accommodate
pub fn run(
    region: FeasibleRegion,
    cache: Option<PathCache>,
    order: Option<Vec<String>>,
    steps: Vec<StepArg>,
    config: &AppConfig,
) -> anyhow::Result<WalkReport> {
    if steps.len() > region.dimensions().len() {
        return Err(CliError::TooManySteps)?;
    }

    let oracle = ClarabelOracle::from(&config.solver);
    let mut session = Session::new(Arc::new(region), oracle, &config.explorer);
    if let Some(cache) = cache {
        session = session.with_cache(Arc::new(cache))?;
    }
    if let Some(order) = order {
        session.reorder(order.into_iter().map(Dimension::from).collect())?;
    }

    let mut reports = Vec::with_capacity(steps.len());
    let mut stopped = None;
    for StepArg { direction, value } in steps {
        let Some(dimension) = session.current_dimension().cloned() else {
            break;
        };
        let _span = span!(Level::DEBUG, "step", %dimension, %direction).entered();

        let extreme = match session.choose_direction(&dimension, direction) {
            Ok(extreme) => extreme.point.clone(),
            Err(error) if error.is_infeasible() => {
                stopped = Some(session.message().to_owned());
                break;
            }
            Err(error) => return Err(error)?,
        };
        let anchor = match session.commit(value) {
            Ok(anchor) => anchor.point.clone(),
            Err(error) if error.is_infeasible() => {
                stopped = Some(session.message().to_owned());
                break;
            }
            Err(error) => return Err(error)?,
        };

        reports.push(StepReport {
            dimension,
            direction,
            value,
            extreme,
            anchor,
            message: session.message().to_owned(),
        });
    }

    if let Some(reason) = &stopped {
        event!(Level::WARN, completed = reports.len(), reason, "walk stopped early");
    }

    Ok(WalkReport {
        order: session.priority_order().to_vec(),
        steps: reports,
        stopped,
        phase: session.phase(),
        constraints: session.constraints().snapshot(),
        selections: session.selections().to_vec(),
    })
}
