pub struct DefaultsConfig {
    pub force_constant: f64,
    pub rest_length: f64,
    pub initial_separation: f64,
    pub chain_particles: usize,
    pub well_particles: usize,
    pub well_stiffness: [f64; 3],
    pub well_offset: f64,
    pub cluster_per_side: usize,
    pub cluster_spacing: f64,
    pub r_min: f64,
    pub well_depth: f64,
    pub step_size: f64,
    pub iterations: usize,
    pub energy_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            force_constant: 10.0,
            rest_length: 1.0,
            initial_separation: 2.0,
            chain_particles: 8,
            well_particles: 4,
            well_stiffness: [1.0, 10.0, 100.0],
            well_offset: 1.0,
            cluster_per_side: 3,
            cluster_spacing: 1.2,
            r_min: 1.0,
            well_depth: 1.0,
            step_size: 1e-3,
            iterations: 500,
            energy_tolerance: 1e-8,
            max_iterations: 0,
        }
    }
}
