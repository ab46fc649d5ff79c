//! Planar multi-joint reaching arm.
use super::{ActVec, ObsVec};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rtd3_core::{Env, Step};
use std::f32::consts::PI;

const DT: f32 = 0.05;

/// Configuration of [`ReacherEnv`].
#[derive(Clone, Debug)]
pub struct ReacherConfig {
    /// Side length of the square workspace, in pixels.
    pub screen_size: f32,

    /// Length of each arm segment, base to tip.
    pub link_lengths: Vec<f32>,

    /// Joint angles after a reset.
    pub ini_joint_angles: Vec<f32>,

    /// Target position in workspace coordinates.
    pub target_pos: [f32; 2],

    /// Distance under which the target counts as reached.
    pub reach_threshold: f32,

    /// Emit a 0/1 reached reward instead of the dense negative distance.
    pub sparse_reward: bool,

    /// Steps after which the episode terminates.
    pub max_steps: usize,

    /// Half-width of the valid angular-velocity command per joint.
    pub act_range: f32,

    /// Draw a fresh random target on every reset.
    pub change_goal: bool,
}

impl Default for ReacherConfig {
    fn default() -> Self {
        Self {
            screen_size: 1000.0,
            link_lengths: vec![200.0, 140.0],
            ini_joint_angles: vec![0.1, 0.1],
            target_pos: [369.0, 430.0],
            reach_threshold: 20.0,
            sparse_reward: false,
            max_steps: 20,
            act_range: 10.0,
            change_goal: false,
        }
    }
}

/// Planar arm reaching for a fixed target.
///
/// The arm is anchored at the workspace center. Each action component is an
/// angular-velocity command for one joint, clamped to `[-act_range,
/// act_range]` and integrated over one timestep. The observation is the
/// joint angles followed by the fingertip-to-target offset, both normalized
/// by the workspace size.
///
/// The dense reward is the negative fingertip-to-target distance normalized
/// by the workspace size; the sparse variant pays 1 on reaching the target
/// and 0 otherwise. Reaching the target terminates the episode in both
/// variants.
pub struct ReacherEnv {
    config: ReacherConfig,
    joint_angles: Vec<f32>,
    target: [f32; 2],
    steps: usize,
    rng: StdRng,
}

impl ReacherEnv {
    /// Number of action dimensions, one per joint.
    pub fn num_joints(&self) -> usize {
        self.config.link_lengths.len()
    }

    fn fingertip(&self) -> [f32; 2] {
        let center = self.config.screen_size / 2.0;
        let mut pos = [center, center];
        let mut angle = 0f32;
        for (theta, len) in self.joint_angles.iter().zip(&self.config.link_lengths) {
            angle += theta;
            pos[0] += len * angle.cos();
            pos[1] += len * angle.sin();
        }
        pos
    }

    fn distance(&self) -> f32 {
        let tip = self.fingertip();
        let dx = self.target[0] - tip[0];
        let dy = self.target[1] - tip[1];
        (dx * dx + dy * dy).sqrt()
    }

    fn obs(&self) -> ObsVec {
        let tip = self.fingertip();
        let scale = self.config.screen_size;
        let mut v = self.joint_angles.clone();
        v.push((self.target[0] - tip[0]) / scale);
        v.push((self.target[1] - tip[1]) / scale);
        ObsVec(v)
    }

    /// Valid command range, as `(low, high)` per action dimension.
    pub fn action_bounds(&self) -> (Vec<f32>, Vec<f32>) {
        let n = self.num_joints();
        (vec![-self.config.act_range; n], vec![self.config.act_range; n])
    }
}

impl Env for ReacherEnv {
    type Config = ReacherConfig;
    type Obs = ObsVec;
    type Act = ActVec;
    type Info = ();

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        Ok(Self {
            joint_angles: config.ini_joint_angles.clone(),
            target: config.target_pos,
            steps: 0,
            rng: StdRng::seed_from_u64(seed),
            config: config.clone(),
        })
    }

    fn step(&mut self, act: &ActVec) -> Step<Self> {
        let range = self.config.act_range;
        for (theta, a) in self.joint_angles.iter_mut().zip(&act.0) {
            *theta = (*theta + a.clamp(-range, range) * DT).rem_euclid(2.0 * PI);
        }

        let distance = self.distance();
        let reached = distance < self.config.reach_threshold;
        let reward = if self.config.sparse_reward {
            if reached {
                1.0
            } else {
                0.0
            }
        } else {
            -distance / self.config.screen_size
        };

        self.steps += 1;
        let is_done = reached || self.steps >= self.config.max_steps;
        Step::new(self.obs(), reward, is_done, ())
    }

    fn reset(&mut self) -> Result<ObsVec> {
        self.joint_angles = self.config.ini_joint_angles.clone();
        if self.config.change_goal {
            let reach: f32 = self.config.link_lengths.iter().sum();
            let center = self.config.screen_size / 2.0;
            let angle = self.rng.gen_range(0.0..2.0 * PI);
            let radius = self.rng.gen_range(0.0..reach);
            self.target = [
                center + radius * angle.cos(),
                center + radius * angle.sin(),
            ];
        }
        self.steps = 0;
        Ok(self.obs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingertip_follows_kinematic_chain() {
        let config = ReacherConfig {
            ini_joint_angles: vec![0.0, 0.0],
            ..Default::default()
        };
        let env = ReacherEnv::build(&config, 0).unwrap();
        // With all angles at zero the arm lies flat along the x axis.
        let tip = env.fingertip();
        assert!((tip[0] - (500.0 + 340.0)).abs() < 1e-3);
        assert!((tip[1] - 500.0).abs() < 1e-3);
    }

    #[test]
    fn dense_reward_increases_as_the_tip_approaches_the_target() {
        let config = ReacherConfig::default();
        let mut env = ReacherEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        let d0 = env.distance();
        // Command both joints towards the target and compare rewards.
        let step = env.step(&ActVec(vec![10.0, 10.0]));
        if env.distance() < d0 {
            assert!(step.reward > -d0 / config.screen_size);
        }
    }

    #[test]
    fn reaching_the_target_terminates() {
        let config = ReacherConfig {
            reach_threshold: 1e6,
            sparse_reward: true,
            ..Default::default()
        };
        let mut env = ReacherEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        let step = env.step(&ActVec(vec![0.0, 0.0]));
        assert!(step.is_done);
        assert_eq!(step.reward, 1.0);
    }

    #[test]
    fn step_cap_terminates() {
        let config = ReacherConfig {
            max_steps: 3,
            ..Default::default()
        };
        let mut env = ReacherEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        let act = ActVec(vec![0.0, 0.0]);
        assert!(!env.step(&act).is_done);
        assert!(!env.step(&act).is_done);
        assert!(env.step(&act).is_done);
    }
}
