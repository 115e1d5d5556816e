//! Pre-built command output scenarios for testing.
//!
//! These mirror what the administrative tools print on a small SmartOS
//! box: two CPUs, a global zone plus two non-global ones, three pools and
//! a couple of faulted vdevs.

use super::runner::MockRunner;

/// `kstat -p` statistics of the SmartOS scenario, one `(key, value)` pair
/// per line of output.
const KSTATS: &[(&str, &str)] = &[
    ("cpu:0:sys:class", "misc"),
    ("cpu:0:sys:cpu_nsec_idle", "8000"),
    ("cpu:0:sys:cpu_nsec_intr", "20"),
    ("cpu:0:sys:cpu_nsec_kernel", "1500"),
    ("cpu:0:sys:cpu_nsec_user", "500"),
    ("cpu:0:sys:crtime", "28.103448271"),
    ("cpu:0:vm:class", "misc"),
    ("cpu:0:vm:anonpgin", "1"),
    ("cpu:0:vm:pgin", "3"),
    ("cpu:0:vm:pgout", "2"),
    ("cpu:0:vm:pgpgin", "10"),
    ("cpu:1:sys:class", "misc"),
    ("cpu:1:sys:cpu_nsec_idle", "7000"),
    ("cpu:1:sys:cpu_nsec_intr", "30"),
    ("cpu:1:sys:cpu_nsec_kernel", "2500"),
    ("cpu:1:sys:cpu_nsec_user", "800"),
    ("cpu:1:sys:crtime", "28.103521954"),
    ("cpu:1:vm:class", "misc"),
    ("cpu:1:vm:anonpgin", "2"),
    ("cpu:1:vm:pgin", "5"),
    ("cpu:1:vm:pgout", "4"),
    ("cpu:1:vm:pgpgin", "12"),
    ("cpu_info:0:cpu_info0:class", "misc"),
    ("cpu_info:0:cpu_info0:brand", "Intel(r) Xeon(r) CPU E5-2670 0 @ 2.60GHz"),
    ("cpu_info:0:cpu_info0:chip_id", "0"),
    ("cpu_info:0:cpu_info0:clock_MHz", "2600"),
    ("cpu_info:0:cpu_info0:core_id", "0"),
    ("cpu_info:0:cpu_info0:current_clock_Hz", "2600000000"),
    ("cpu_info:0:cpu_info0:state", "on-line"),
    ("cpu_info:1:cpu_info1:class", "misc"),
    ("cpu_info:1:cpu_info1:brand", "Intel(r) Xeon(r) CPU E5-2670 0 @ 2.60GHz"),
    ("cpu_info:1:cpu_info1:chip_id", "0"),
    ("cpu_info:1:cpu_info1:clock_MHz", "2600"),
    ("cpu_info:1:cpu_info1:core_id", "1"),
    ("cpu_info:1:cpu_info1:current_clock_Hz", "1200000000"),
    ("cpu_info:1:cpu_info1:state", "on-line"),
    ("zones:0:global:class", "zone_misc"),
    ("zones:0:global:nsec_sys", "9000"),
    ("zones:0:global:nsec_user", "4000"),
    ("zones:0:global:zonename", "global"),
    ("zones:42:cube-media:class", "zone_misc"),
    ("zones:42:cube-media:nsec_sys", "300"),
    ("zones:42:cube-media:nsec_user", "200"),
    ("zones:42:cube-media:zonename", "cube-media"),
    ("zones:44:cube-ws:class", "zone_misc"),
    ("zones:44:cube-ws:nsec_user", "10"),
    ("zones:44:cube-ws:zonename", "cube-ws"),
    ("unix:0:system_pages:class", "pages"),
    ("unix:0:system_pages:pagesfree", "100000"),
    ("unix:0:system_pages:physmem", "4000000"),
    ("unix:0:system_pages:pp_kernel", "52000"),
    ("unix:0:vminfo:class", "vm"),
    ("unix:0:vminfo:freemem", "1500000"),
    ("unix:0:vminfo:swap_alloc", "20"),
    ("unix:0:vminfo:swap_avail", "30"),
    ("unix:0:vminfo:swap_free", "40"),
    ("unix:0:vminfo:swap_resv", "50"),
    ("unix:0:vminfo:updates", "99"),
    ("zfs:0:arcstats:class", "misc"),
    ("zfs:0:arcstats:hits", "5"),
    ("zfs:0:arcstats:size", "1073741824"),
    ("sderr:0:sd0,err:class", "device_error"),
    ("sderr:0:sd0,err:Hard Errors", "0"),
    ("sderr:0:sd0,err:Illegal Request", "6"),
    ("sderr:0:sd0,err:Product", "Samsung SSD 860"),
    ("sderr:0:sd0,err:Revision", "RVT0"),
    ("sderr:0:sd0,err:Serial No", "S3Z9NB0K"),
    ("sderr:0:sd0,err:Size", "500107862016"),
    ("sderr:0:sd0,err:Soft Errors", "0"),
    ("sderr:0:sd0,err:Transport Errors", "0"),
    ("sderr:0:sd0,err:Vendor", "ATA"),
    ("sderr:6:sd6,err:class", "device_error"),
    ("sderr:6:sd6,err:Device Not Ready", "0"),
    ("sderr:6:sd6,err:Hard Errors", "0"),
    ("sderr:6:sd6,err:Illegal Request", "1148"),
    ("sderr:6:sd6,err:Media Error", "0"),
    ("sderr:6:sd6,err:Product", "My Passport 2627"),
    ("sderr:6:sd6,err:Serial No", "WXP1E7916Z6K"),
    ("sderr:6:sd6,err:Size", "2000365289472"),
    ("sderr:6:sd6,err:Soft Errors", "0"),
    ("sderr:6:sd6,err:Transport Errors", "0"),
    ("sderr:6:sd6,err:Vendor", "WD"),
    ("sd:0:sd0:class", "disk"),
    ("sd:0:sd0:nread", "1048576"),
    ("sd:0:sd0:nwritten", "2097152"),
    ("sd:0:sd0:reads", "100"),
    ("sd:0:sd0:writes", "200"),
    ("sd:0:sd0:wtime", "11"),
    ("sd:0:sd0:wlentime", "12"),
    ("sd:0:sd0:wlastupdate", "13"),
    ("sd:0:sd0:rtime", "14"),
    ("sd:0:sd0:rlentime", "15"),
    ("sd:0:sd0:rlastupdate", "16"),
    ("sd:0:sd0:wcnt", "0"),
    ("sd:0:sd0:rcnt", "1"),
    ("sd:3:sd3:class", "disk"),
    ("sd:3:sd3:nread", "4096"),
    ("sd:3:sd3:nwritten", "8192"),
    ("sd:3:sd3:reads", "1"),
    ("sd:3:sd3:writes", "2"),
    ("sd:3:sd3:wtime", "0"),
    ("sd:3:sd3:wlentime", "0"),
    ("sd:3:sd3:wlastupdate", "0"),
    ("sd:3:sd3:rtime", "0"),
    ("sd:3:sd3:rlentime", "0"),
    ("sd:3:sd3:rlastupdate", "0"),
    ("sd:3:sd3:wcnt", "0"),
    ("sd:3:sd3:rcnt", "0"),
    ("zfs:0:rpool:class", "disk"),
    ("zfs:0:rpool:nread", "5000"),
    ("zfs:0:rpool:nwritten", "6000"),
    ("zfs:0:rpool:reads", "50"),
    ("zfs:0:rpool:writes", "60"),
    ("zfs:0:rpool:wtime", "0"),
    ("zfs:0:rpool:wlentime", "0"),
    ("zfs:0:rpool:wlastupdate", "0"),
    ("zfs:0:rpool:rtime", "0"),
    ("zfs:0:rpool:rlentime", "0"),
    ("zfs:0:rpool:rlastupdate", "0"),
    ("zfs:0:rpool:wcnt", "0"),
    ("zfs:0:rpool:rcnt", "0"),
    ("link:0:rge0:class", "net"),
    ("link:0:rge0:ifspeed", "1000000000"),
    ("link:0:rge0:ipackets64", "5"),
    ("link:0:rge0:obytes64", "10"),
    ("link:0:rge0:rbytes64", "22"),
    ("link:0:cube_media0:class", "net"),
    ("link:0:cube_media0:ifspeed", "1000000000"),
    ("link:0:cube_media0:ipackets64", "7"),
    ("link:0:cube_media0:obytes64", "100"),
    ("link:0:cube_media0:rbytes64", "200"),
    ("nfs:0:rfsreqcnt_v3:class", "misc"),
    ("nfs:0:rfsreqcnt_v3:crtime", "31.5"),
    ("nfs:0:rfsreqcnt_v3:getattr", "40"),
    ("nfs:0:rfsreqcnt_v3:null", "1"),
    ("nfs:0:rfsreqcnt_v3:read", "300"),
    ("nfs:0:rfsreqcnt_v3:write", "120"),
    ("nfs:0:rfsreqcnt_v4:class", "misc"),
    ("nfs:0:rfsreqcnt_v4:getattr", "8"),
    ("nfs:0:rfsreqcnt_v4:null", "0"),
    ("nfs:0:rfsreqcnt_v4:read", "9"),
    ("nfs:0:rfsreqcnt_v4:write", "10"),
    ("nfs:0:rfsproccnt_v3:class", "misc"),
    ("nfs:0:rfsproccnt_v3:getattr", "50"),
    ("nfs:0:rfsproccnt_v3:null", "2"),
    ("nfs:0:rfsproccnt_v3:read", "3"),
    ("nfs:0:rfsproccnt_v3:write", "4"),
    ("nfs:0:rfsproccnt_v4:class", "misc"),
    ("nfs:0:rfsproccnt_v4:getattr", "1"),
    ("nfs:0:rfsproccnt_v4:null", "0"),
    ("nfs:0:rfsproccnt_v4:read", "2"),
    ("nfs:0:rfsproccnt_v4:write", "3"),
    ("caps:42:cpucaps_zone_42:class", "zone_caps"),
    ("caps:42:cpucaps_zone_42:above_sec", "10"),
    ("caps:42:cpucaps_zone_42:baseline", "0"),
    ("caps:42:cpucaps_zone_42:below_sec", "5000"),
    ("caps:42:cpucaps_zone_42:effective", "100"),
    ("caps:42:cpucaps_zone_42:maxusage", "250"),
    ("caps:42:cpucaps_zone_42:nwait", "0"),
    ("caps:42:cpucaps_zone_42:usage", "30"),
    ("caps:42:cpucaps_zone_42:value", "400"),
    ("caps:42:cpucaps_zone_42:zonename", "cube-media"),
    ("caps:42:lockedmem_zone_42:class", "zone_caps"),
    ("caps:42:lockedmem_zone_42:usage", "0"),
    ("caps:42:lockedmem_zone_42:value", "2147483648"),
    ("caps:42:lockedmem_zone_42:zonename", "cube-media"),
    ("caps:42:nprocs_zone_42:class", "zone_caps"),
    ("caps:42:nprocs_zone_42:usage", "41"),
    ("caps:42:nprocs_zone_42:value", "2000"),
    ("caps:42:nprocs_zone_42:zonename", "cube-media"),
    ("caps:42:swapresv_zone_42:class", "zone_caps"),
    ("caps:42:swapresv_zone_42:usage", "123456"),
    ("caps:42:swapresv_zone_42:value", "2147483648"),
    ("caps:42:swapresv_zone_42:zonename", "cube-media"),
    ("memory_cap:42:cube-media:class", "zone_memory_cap"),
    ("memory_cap:42:cube-media:anonpgin", "4"),
    ("memory_cap:42:cube-media:nover", "0"),
    ("memory_cap:42:cube-media:physcap", "2147483648"),
    ("memory_cap:42:cube-media:rss", "1048576000"),
    ("memory_cap:42:cube-media:swap", "123456"),
    ("memory_cap:42:cube-media:swapcap", "2147483648"),
    ("memory_cap:42:cube-media:zonename", "cube-media"),
];

const SWAP: &str =
    "total: 2852796k bytes allocated + 413860k reserved = 3266656k used, 12044664k available\n";

const ZPOOL_LIST: &str = "\
NAME    SIZE  ALLOC   FREE  CKPOINT  EXPANDSZ   FRAG    CAP  DEDUP  HEALTH  ALTROOT
big    3.62T  2.69T   959G        -         -     2%    74%  1.00x  ONLINE  -
fast    262G   104G   158G        -         -    25%    39%  1.00x  ONLINE  -
rpool   199G  57.1G   142G        -         -    63%    28%  1.00x  ONLINE  -
";

const FMSTAT: &str = "\
module             ev_recv ev_acpt wait  svc_t  %w  %b  open solve  memsz  bufsz
cpumem-retire            0       0  0.0    0.0   0   0     0     0      0      0
disk-lights              2       0  0.0    3.4   0   0     0     0    28b      0
eft                      4       0  0.0   15.9   0   0     0     0   1.3M      0
fmd-self-diagnosis     367       0  0.0   25.7   0   0     0     0      0      0
io-retire                0       0  0.0    0.0   0   0     0     0      0      0
software-response        0       0  0.0    0.9   0   0     0     0   2.3K   2.0K
zfs-retire             214       0  0.0  377.8   0   0     0     0      4      0
";

const FMADM_FAULTY: &str = "\
--------------- ------------------------------------  -------------- ---------
TIME            EVENT-ID                              MSG-ID         SEVERITY
--------------- ------------------------------------  -------------- ---------
Jan 21 14:07:02 6d9d2b5e-1b3f-4a8c-e6b1-b9a8b6a4d1c2  ZFS-8000-GH    Major

Host        : cube
Platform    : To-Be-Filled-By-O.E.M.
Product_sn  :

Problem class : fault.fs.zfs.vdev.checksum
Problem class : fault.fs.zfs.vdev.io
Affects       : zfs://pool=big/vdev=9ef9f0dcd8d1bd80
                    faulted and taken out of service

--------------- ------------------------------------  -------------- ---------
TIME            EVENT-ID                              MSG-ID         SEVERITY
--------------- ------------------------------------  -------------- ---------
Feb 02 09:12:44 1e0d3a8c-8f2b-c5e4-a1f2-e3b4c5d6e7f8  ZFS-8000-FD    Major

Problem class : fault.fs.zfs.vdev.io
Problem class : fault.fs.zfs.vdev.io
Problem class : fault.fs.zfs.vdev.probe_failure
Problem class : fault.fs.zfs.vdev.probe_failure
Problem class : fault.fs.zfs.vdev.probe_failure

--------------- ------------------------------------  -------------- ---------
TIME            EVENT-ID                              MSG-ID         SEVERITY
--------------- ------------------------------------  -------------- ---------
Mar 11 18:40:05 a7c2e9f1-4d6b-e8a3-b2c1-d4e5f6a7b8c9  PCIEX-8000-DJ  Minor

Problem class : fault.io.pciex.device-interr-corr
";

const SVCS: &str = "\
cube-pkgsrc      maintenance    svc:/system/filesystem/local:default
cube-pkgsrc      online         svc:/system/filesystem/minimal:default
cube-pkgsrc      online         svc:/system/manifest-import:default
cube-pkgsrc      online         svc:/system/identity:node
cube-pkgsrc      online         svc:/system/boot-archive:default
cube-pkgsrc      disabled       svc:/system/svc/global:default
cube-cron        legacy_run     lrc:/etc/rc2_d/S89PRESERVE
cube-cron        legacy_run     lrc:/etc/rc2_d/S20sysetup
cube-cron        online         svc:/sysdef/puppet:default
cube-cron        online         svc:/system/boot-config:default
cube-cron        online         svc:/system/device/audio:default
cube-cron        disabled       svc:/system/device/mpxio-upgrade:default
cube-cron        disabled       svc:/system/device/allocate:default
global           legacy_run     lrc:/etc/rc2_d/S89PRESERVE
global           legacy_run     lrc:/etc/rc2_d/S81dodatadm_udaplt
global           legacy_run     lrc:/etc/rc2_d/S20sysetup
global           online         svc:/system/config-assemble:services
global           online         svc:/sdef/diamond:default
global           disabled       svc:/network/varpd:default
";

const ZONEADM: &str = "\
0:global:running:/::ipkg:shared:0
42:cube-media:running:/zones/cube-media:c624d04f-d0d9-e1e6-822e-acebc78ec9ff:lipkg:excl:128
44:cube-ws:installed:/zones/cube-ws:0f9c56f4-9810-6d45-f801-d34bf27cc13f:pkgsrc:excl:179
";

const DLADM_VNICS: &str = "cube_media0:rge0:1000:cube-media\n";

/// `kstat -p` output of the SmartOS scenario.
pub fn smartos_kstat_text() -> String {
    let mut text = String::new();
    for (key, value) in KSTATS {
        text.push_str(key);
        text.push('\t');
        text.push_str(value);
        text.push('\n');
    }
    text
}

#[allow(dead_code)]
impl MockRunner {
    /// A SmartOS global zone with every tool the collectors run.
    ///
    /// Includes: kstats for two CPUs, zones `global`, `cube-media` and
    /// `cube-ws`, disks `sd0` and `sd6`, link `rge0` plus VNIC
    /// `cube_media0`, NFS v3/v4, zone caps for `cube-media`; `zpool list`
    /// with pools `big`, `fast`, `rpool`; `fmstat`, `fmadm faulty`, `svcs`,
    /// `zoneadm`, `dladm`, `swap -s`, `pagesize` and `zonename`.
    pub fn smartos_host() -> Self {
        let mut runner = Self::new();
        runner.add_output("/usr/bin/kstat -p", smartos_kstat_text());
        runner.add_output("/usr/bin/pagesize", "4096\n");
        runner.add_output("/usr/bin/zonename", "global\n");
        runner.add_output("/usr/sbin/swap -s", SWAP);
        runner.add_output("/usr/sbin/zpool list", ZPOOL_LIST);
        runner.add_output("/bin/pfexec /usr/sbin/fmstat", FMSTAT);
        runner.add_output("/bin/pfexec /usr/sbin/fmadm faulty", FMADM_FAULTY);
        runner.add_output("/bin/svcs -aHZ -ozone,state,fmri", SVCS);
        runner.add_output("/usr/sbin/zoneadm list -cp", ZONEADM);
        runner.add_output(
            "/usr/sbin/dladm show-vnic -p -o link,over,speed,zone",
            DLADM_VNICS,
        );
        runner
    }

    /// A freshly installed host: tools present but nothing to report.
    ///
    /// `zpool list` and `fmstat` print only their headers, the rest print
    /// nothing at all.
    pub fn idle_host() -> Self {
        let mut runner = Self::new();
        runner.add_output("/usr/bin/kstat -p", "");
        runner.add_output("/usr/bin/pagesize", "4096\n");
        runner.add_output("/usr/bin/zonename", "global\n");
        runner.add_output("/usr/sbin/swap -s", SWAP);
        runner.add_output(
            "/usr/sbin/zpool list",
            "NAME    SIZE  ALLOC   FREE  CKPOINT  EXPANDSZ   FRAG    CAP  DEDUP  HEALTH  ALTROOT\n",
        );
        runner.add_output(
            "/bin/pfexec /usr/sbin/fmstat",
            "module             ev_recv ev_acpt wait  svc_t  %w  %b  open solve  memsz  bufsz\n",
        );
        runner.add_output("/bin/pfexec /usr/sbin/fmadm faulty", "");
        runner.add_output("/bin/svcs -aHZ -ozone,state,fmri", "");
        runner.add_output("/usr/sbin/zoneadm list -cp", "");
        runner.add_output("/usr/sbin/dladm show-vnic -p -o link,over,speed,zone", "");
        runner
    }

    /// A non-global zone: `dladm` and `fmadm` are not permitted there.
    pub fn smartos_zone() -> Self {
        let mut runner = Self::smartos_host();
        runner.add_output("/usr/bin/zonename", "cube-media\n");
        runner.add_failure(
            "/usr/sbin/dladm show-vnic -p -o link,over,speed,zone",
            1,
            "dladm: insufficient privileges",
        );
        runner.add_failure(
            "/bin/pfexec /usr/sbin/fmadm faulty",
            1,
            "fmadm: failed to connect to fmd: permission denied",
        );
        runner
    }
}
